//! `bookkeep-core`: shared bookkeeping building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod filter;
pub mod id;
pub mod money;
pub mod session;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use filter::{DateRange, TextQuery};
pub use id::{AccountId, EntryId, TransactionId, VoucherId};
pub use money::{Amount, AmountError, format_amount, format_signed};
pub use session::Session;
pub use value_object::ValueObject;
