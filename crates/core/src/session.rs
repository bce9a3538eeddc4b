//! Session capability handed to the view layer by its host.

use serde::{Deserialize, Serialize};

/// Who is using the books and whether they may change them.
///
/// The host application owns authentication; the bookkeeping layer only
/// consumes the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user: String,
    can_write: bool,
}

impl Session {
    pub fn new(user: impl Into<String>, can_write: bool) -> Self {
        Self {
            user: user.into(),
            can_write,
        }
    }

    /// Session that may read and change every record.
    pub fn editor(user: impl Into<String>) -> Self {
        Self::new(user, true)
    }

    /// Session limited to browsing.
    pub fn viewer(user: impl Into<String>) -> Self {
        Self::new(user, false)
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn can_write(&self) -> bool {
        self.can_write
    }
}
