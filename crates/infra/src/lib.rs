//! Infrastructure layer: persistence, attachments, notifications, config,
//! and the application services that tie them to the domain crates.

pub mod attachments;
pub mod books;
pub mod config;
pub mod notify;
pub mod repository;
pub mod seed;

pub use attachments::{AttachmentError, AttachmentStore, InMemoryAttachmentStore, Upload};
pub use books::{Books, BooksError};
pub use config::BooksConfig;
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use repository::{InMemoryRepository, Repository};
