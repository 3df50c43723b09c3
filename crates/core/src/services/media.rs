//! Media service: upload validation and file storage.

use std::sync::Arc;

use photoshare_common::{AppError, AppResult, StorageBackend, generate_storage_key};
use serde::Serialize;

/// Accepted upload content types.
const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// A stored image file.
#[derive(Debug, Clone, Serialize)]
pub struct StoredImage {
    /// Storage key, scoped under the owner.
    pub key: String,
    /// Public URL of the file.
    pub url: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// File size in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
}

/// Service for validating and storing uploaded images.
#[derive(Clone)]
pub struct MediaService {
    storage: Arc<dyn StorageBackend>,
    max_upload_bytes: usize,
}

impl MediaService {
    /// Create a new media service.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>, max_upload_bytes: usize) -> Self {
        Self {
            storage,
            max_upload_bytes,
        }
    }

    /// Validate and persist an uploaded image under the owner's prefix.
    ///
    /// The bytes are decoded to verify they really are an image of a
    /// supported format before anything touches storage.
    pub async fn store_photo(
        &self,
        user_id: &str,
        original_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> AppResult<StoredImage> {
        if data.is_empty() {
            return Err(AppError::Validation("Image file is empty".to_string()));
        }
        if data.len() > self.max_upload_bytes {
            return Err(AppError::Validation(format!(
                "Image exceeds the maximum upload size of {} bytes",
                self.max_upload_bytes
            )));
        }
        if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
            return Err(AppError::Validation(format!(
                "Unsupported content type: {content_type}"
            )));
        }

        let decoded = image::load_from_memory(data)
            .map_err(|e| AppError::Validation(format!("Invalid image file: {e}")))?;

        let key = generate_storage_key(user_id, original_name);
        let stored = self.storage.upload(&key, data, content_type).await?;

        tracing::debug!(key = %stored.key, size = stored.size, "Stored uploaded image");

        Ok(StoredImage {
            key: stored.key,
            url: stored.url,
            width: decoded.width(),
            height: decoded.height(),
            size: stored.size,
            content_type: stored.content_type,
        })
    }

    /// Remove a stored file. Missing files are not an error.
    pub async fn remove(&self, key: &str) -> AppResult<()> {
        self.storage.delete(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photoshare_common::LocalStorage;
    use std::path::PathBuf;

    fn service(max: usize) -> MediaService {
        let storage = Arc::new(LocalStorage::new(
            PathBuf::from(std::env::temp_dir()).join("photoshare-media-tests"),
            "/media".to_string(),
        ));
        MediaService::new(storage, max)
    }

    /// Smallest valid 1x1 PNG.
    fn tiny_png() -> Vec<u8> {
        vec![
            0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48,
            0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
            0x00, 0x1f, 0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78,
            0xda, 0x63, 0xf8, 0xcf, 0xc0, 0xf0, 0x1f, 0x00, 0x05, 0x00, 0x01, 0xff, 0x56, 0xc7,
            0x2f, 0x0d, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
        ]
    }

    #[tokio::test]
    async fn test_store_photo_round_trip() {
        let svc = service(1024 * 1024);
        let stored = svc
            .store_photo("u1", "dot.png", "image/png", &tiny_png())
            .await
            .unwrap();

        assert!(stored.key.starts_with("photos/u1/"));
        assert_eq!(stored.width, 1);
        assert_eq!(stored.height, 1);

        svc.remove(&stored.key).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_oversized_upload() {
        let svc = service(8);
        let err = svc
            .store_photo("u1", "dot.png", "image/png", &tiny_png())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_rejects_non_image_bytes() {
        let svc = service(1024);
        let err = svc
            .store_photo("u1", "fake.png", "image/png", b"definitely not a png")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_rejects_unsupported_content_type() {
        let svc = service(1024);
        let err = svc
            .store_photo("u1", "movie.mp4", "video/mp4", &tiny_png())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
