//! Template and output storage.
//!
//! Blob storage is an external collaborator: the engine only needs
//! `get`/`put` over opaque keys. `DocumentStore` adapts whatever backend
//! the caller injects to the two operations the engine performs: fetch a
//! template, persist generated output.

use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested key does not exist in the backend
    #[error("template not found: {0}")]
    NotFound(String),

    /// Anything else the backend reports
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Minimal blob storage contract.
pub trait BlobStore {
    /// Fetch the bytes stored under `key`.
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Store `bytes` under `key` and return a retrievable location.
    fn put(&self, bytes: &[u8], key: &str) -> Result<String, StoreError>;
}

/// Document-level adapter over a blob store.
pub struct DocumentStore<S: BlobStore> {
    store: S,
}

impl<S: BlobStore> DocumentStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Fetch template bytes. `NotFound` is fatal for the whole batch:
    /// without a template there is nothing to mutate.
    pub fn fetch_template(&self, reference: &str) -> Result<Vec<u8>, StoreError> {
        self.store.get(reference)
    }

    /// Persist generated output and return its location.
    pub fn put_output(&self, bytes: &[u8], name: &str) -> Result<String, StoreError> {
        self.store.put(bytes, name)
    }

    /// Access the wrapped backend.
    pub fn backend(&self) -> &S {
        &self.store
    }
}

/// In-memory backend, for tests and local runs.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.objects
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn put(&self, bytes: &[u8], key: &str) -> Result<String, StoreError> {
        self.objects
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .insert(key.to_string(), bytes.to_vec());
        Ok(format!("memory://{key}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = DocumentStore::new(MemoryStore::new());

        let url = store.put_output(b"deck bytes", "output.pptx").unwrap();
        assert_eq!(url, "memory://output.pptx");
        assert_eq!(store.fetch_template("output.pptx").unwrap(), b"deck bytes");
    }

    #[test]
    fn test_missing_template_is_not_found() {
        let store = DocumentStore::new(MemoryStore::new());
        assert!(matches!(
            store.fetch_template("absent.pptx"),
            Err(StoreError::NotFound(_))
        ));
    }
}
