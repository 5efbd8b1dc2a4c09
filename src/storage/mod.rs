//! Durable thumbnail persistence.
//!
//! The store is a capability interface with a single filesystem-backed
//! implementation. The pipeline only ever talks to the trait, so tests run
//! against a temporary root and an alternative backend would slot in
//! without touching the orchestrator.

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::StoredThumbnail;

pub mod local;

pub use local::LocalThumbnailStore;

#[async_trait]
pub trait ThumbnailStore: Send + Sync {
    /// Persist `content` under a freshly generated identifier.
    ///
    /// The write is atomic: on failure nothing is visible under the
    /// returned identifier. Storage is write-once; there is no update or
    /// delete.
    async fn save(
        &self,
        content: &[u8],
        content_type: &str,
        original_filename: Option<&str>,
    ) -> Result<StoredThumbnail>;

    /// Retrieve a stored thumbnail and its bytes by identifier.
    ///
    /// The content-type is re-derived from how the object was stored, so
    /// it is answered truthfully for every object ever saved.
    async fn open(&self, id: &str) -> Result<(StoredThumbnail, Vec<u8>)>;
}
