//! `scan/data` ingestion: persists one image's partial detections and hands
//! the raw image payload to blob storage. Insert-then-upload, logging both
//! steps, never failing compilation of the scan over a storage hiccup.

use model::messages::ScanData;
use store::PartialStore;

use crate::{collaborators::BlobStore, Error};

/// Ingests one `scan/data` message: persists its partials for later
/// compilation and uploads the raw image to `blob_store`.
pub async fn ingest_scan_data(data: ScanData, partial_store: &dyn PartialStore, blob_store: &dyn BlobStore) -> Result<(), Error> {
    tracing::info!(
        scan_id = %data.scan_id,
        image_id = %data.image_id,
        partial_items = data.partial_items.len(),
        partial_barcodes = data.partial_barcodes.len(),
        "received scan/data"
    );

    partial_store.insert_partials(data.partial_items, data.partial_barcodes).await;

    let bytes = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, &data.image).map_err(|err| Error::MalformedMessage {
        queue: "scan/data",
        reason: format!("image payload is not valid base64: {err}"),
    })?;

    if bytes.is_empty() {
        return Ok(());
    }

    blob_store.store_image(&data.scan_id, &data.image_id, &bytes).await?;
    tracing::info!(scan_id = %data.scan_id, image_id = %data.image_id, bytes = bytes.len(), "uploaded scan image");

    Ok(())
}

#[cfg(test)]
mod test {
    use async_trait::async_trait;
    use model::Side;

    use super::*;
    use crate::collaborators::BlobStoreError;
    use store::memory::InMemoryPartialStore;

    struct RecordingBlobStore {
        uploads: std::sync::Mutex<Vec<(String, String, usize)>>,
    }

    #[async_trait]
    impl BlobStore for RecordingBlobStore {
        async fn store_image(&self, scan_id: &str, image_id: &str, bytes: &[u8]) -> Result<(), BlobStoreError> {
            self.uploads.lock().unwrap().push((scan_id.to_string(), image_id.to_string(), bytes.len()));
            Ok(())
        }
    }

    fn scan_data(image: &str) -> ScanData {
        ScanData {
            scan_id: "scan-1".into(),
            image_id: "image-1".into(),
            aisle_index: 1,
            side: Side::Left,
            partial_items: Vec::new(),
            partial_barcodes: Vec::new(),
            image: image.into(),
        }
    }

    #[tokio::test]
    async fn uploads_decoded_image_bytes() {
        let partials = InMemoryPartialStore::new();
        let blobs = RecordingBlobStore { uploads: std::sync::Mutex::new(Vec::new()) };
        let encoded = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, b"fake-webp-bytes");

        ingest_scan_data(scan_data(&encoded), &partials, &blobs).await.unwrap();

        let uploads = blobs.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, "scan-1");
        assert_eq!(uploads[0].2, "fake-webp-bytes".len());
    }

    #[tokio::test]
    async fn empty_image_is_not_uploaded() {
        let partials = InMemoryPartialStore::new();
        let blobs = RecordingBlobStore { uploads: std::sync::Mutex::new(Vec::new()) };

        ingest_scan_data(scan_data(""), &partials, &blobs).await.unwrap();
        assert!(blobs.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_base64_is_rejected() {
        let partials = InMemoryPartialStore::new();
        let blobs = RecordingBlobStore { uploads: std::sync::Mutex::new(Vec::new()) };

        let err = ingest_scan_data(scan_data("not-valid-base64!!"), &partials, &blobs).await.unwrap_err();
        assert!(matches!(err, Error::MalformedMessage { .. }));
    }
}
