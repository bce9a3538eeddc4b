//! Receipt attachment store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;
use uuid::Uuid;

/// Extensions accepted by the receipt pickers (images and PDF).
const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "pdf"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("attachment {0:?} is empty")]
    Empty(String),

    #[error("attachment {name:?} is {size} bytes (limit {limit})")]
    TooLarge { name: String, size: usize, limit: usize },

    #[error("attachment {0:?} is not an image or PDF")]
    UnsupportedType(String),

    #[error("attachment store unavailable")]
    Unavailable,
}

/// A file picked in a receipt upload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Stores file blobs and hands back a reference string.
pub trait AttachmentStore: Send + Sync {
    fn store(&self, upload: &Upload) -> Result<String, AttachmentError>;
    fn fetch(&self, reference: &str) -> Option<Vec<u8>>;
    /// Drop a stored blob. Returns whether it existed.
    fn remove(&self, reference: &str) -> bool;
}

impl<S> AttachmentStore for Arc<S>
where
    S: AttachmentStore + ?Sized,
{
    fn store(&self, upload: &Upload) -> Result<String, AttachmentError> {
        (**self).store(upload)
    }

    fn fetch(&self, reference: &str) -> Option<Vec<u8>> {
        (**self).fetch(reference)
    }

    fn remove(&self, reference: &str) -> bool {
        (**self).remove(reference)
    }
}

/// In-memory attachment store for tests/dev.
#[derive(Debug)]
pub struct InMemoryAttachmentStore {
    limit: usize,
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryAttachmentStore {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self, upload: &Upload) -> Result<(), AttachmentError> {
        let name = &upload.file_name;
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AttachmentError::UnsupportedType(name.clone()));
        }
        if upload.bytes.is_empty() {
            return Err(AttachmentError::Empty(name.clone()));
        }
        if upload.bytes.len() > self.limit {
            return Err(AttachmentError::TooLarge {
                name: name.clone(),
                size: upload.bytes.len(),
                limit: self.limit,
            });
        }
        Ok(())
    }
}

/// Reference format: `<uuid v7>-<file name without path>`.
fn reference_for(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .replace(char::is_whitespace, "_");
    format!("{}-{}", Uuid::now_v7(), base)
}

impl AttachmentStore for InMemoryAttachmentStore {
    fn store(&self, upload: &Upload) -> Result<String, AttachmentError> {
        self.check(upload)?;
        let reference = reference_for(&upload.file_name);
        let mut blobs = self.blobs.write().map_err(|_| AttachmentError::Unavailable)?;
        blobs.insert(reference.clone(), upload.bytes.clone());
        tracing::debug!(reference = %reference, size = upload.bytes.len(), "stored attachment");
        Ok(reference)
    }

    fn fetch(&self, reference: &str) -> Option<Vec<u8>> {
        let blobs = self.blobs.read().ok()?;
        blobs.get(reference).cloned()
    }

    fn remove(&self, reference: &str) -> bool {
        self.blobs
            .write()
            .map(|mut b| b.remove(reference).is_some())
            .unwrap_or_default()
    }
}
