//! View-layer state for the bookkeeping screens.
//!
//! Holds which tab is active, whether a list or a form is shown, and the
//! draft being edited. Rendering is left to the host; the session is supplied
//! by it as well.

pub mod editor;
pub mod workbench;

pub use editor::{Editor, FieldError, TransactionForm, VoucherForm};
pub use workbench::{Tab, View, Workbench, WorkbenchError};
