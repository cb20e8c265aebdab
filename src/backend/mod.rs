//! Seams to the hosted backend and to durable client storage.
//!
//! The crate owns none of the durable logic; these traits are the whole
//! surface it consumes. `supabase` binds the storage and table traits to
//! the hosted service over HTTP; `file_store` keeps the attribution values
//! on disk.

pub mod file_store;
pub mod supabase;

use crate::errors::BackendError;
use crate::models::draft::FileAttachment;
use async_trait::async_trait;
use serde_json::Value;

/// Options forwarded with a storage upload.
#[derive(Clone, Debug)]
pub struct UploadOptions {
    /// `cache-control` max-age, in seconds, applied to the stored object.
    pub cache_control_secs: u32,

    /// Whether an existing object under the same key may be replaced.
    pub upsert: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            cache_control_secs: 3600,
            upsert: false,
        }
    }
}

/// Hosted object storage.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload `file` under `key` in `bucket`.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        file: &FileAttachment,
        options: &UploadOptions,
    ) -> Result<(), BackendError>;

    /// Public URL of an object. Purely computed; no round-trip.
    fn public_url(&self, bucket: &str, key: &str) -> String;
}

/// Hosted database table accepting row inserts.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, table: &str, rows: &[Value]) -> Result<(), BackendError>;
}

/// Durable client storage: last-write-wins string keys with no expiry.
/// Writes are best-effort by contract; implementations log failures rather
/// than propagate them.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}
