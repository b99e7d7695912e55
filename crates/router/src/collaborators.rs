//! Thin collaborator traits for the systems this crate puts out of scope:
//! blob storage for raw scan images and the image-render generator. The router
//! only needs to hand work off to them; their own implementation (Azure
//! Blob, a rasterizer) lives outside this crate.

use async_trait::async_trait;

/// Raw-image storage for `scan/data` payloads, kept behind the broker as an
/// external collaborator.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores one scan image's raw bytes under a key derived from
    /// `scan_id`/`image_id`.
    async fn store_image(&self, scan_id: &str, image_id: &str, bytes: &[u8]) -> Result<(), BlobStoreError>;
}

/// Error returned by a [`BlobStore`] implementation.
#[derive(thiserror::Error, Debug)]
#[error("blob store failure (scan_id: {scan_id}, image_id: {image_id}): {reason}")]
pub struct BlobStoreError {
    /// Scan the failing upload belongs to.
    pub scan_id: String,
    /// Image the failing upload belongs to.
    pub image_id: String,
    /// Collaborator-supplied failure detail.
    pub reason: String,
}

/// Rasterization/compositing of the current inventory state, kept behind
/// the broker as an external collaborator. The core only gathers
/// the matching items; this trait is handed the gathered set.
#[async_trait]
pub trait RenderGenerator: Send + Sync {
    /// Renders `items` for the aisle/side named in `request`.
    async fn render(&self, request: &model::messages::RenderScanRequest, items: Vec<model::Item>) -> Result<(), RenderError>;
}

/// Error returned by a [`RenderGenerator`] implementation.
#[derive(thiserror::Error, Debug)]
#[error("render generator failure (scan_id: {scan_id}, aisle_index: {aisle_index}): {reason}")]
pub struct RenderError {
    /// Scan the failing render belongs to.
    pub scan_id: String,
    /// Aisle the failing render belongs to.
    pub aisle_index: i64,
    /// Collaborator-supplied failure detail.
    pub reason: String,
}
