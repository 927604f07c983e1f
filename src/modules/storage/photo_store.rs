//! Photo storage port
//!
//! The inline store keeps photos inside the report itself as a `data:` URL,
//! standing in for an object store.

use async_trait::async_trait;
use base64::prelude::*;
use sha2::{Digest, Sha256};

use crate::core::error::{AppError, Result};

/// Image types accepted for report photos
pub const ALLOWED_PHOTO_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// A photo normalised into a referenceable form
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPhoto {
    /// URL or embedded `data:` reference stored on the report
    pub reference: String,
    /// Hex SHA-256 of the original bytes
    pub digest: String,
    pub content_type: String,
    pub size: usize,
}

#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn store(&self, file_name: &str, content_type: &str, data: Vec<u8>)
        -> Result<StoredPhoto>;
}

pub struct InlinePhotoStore {
    max_bytes: usize,
}

impl InlinePhotoStore {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    fn check(&self, content_type: &str, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Err(AppError::UploadFailed("Photo is empty".to_string()));
        }

        if data.len() > self.max_bytes {
            return Err(AppError::UploadFailed(format!(
                "Photo too large. Maximum size is {}",
                format_size(self.max_bytes)
            )));
        }

        if !ALLOWED_PHOTO_TYPES.contains(&content_type) {
            return Err(AppError::UploadFailed(format!(
                "File type '{}' is not allowed. Allowed types: {}",
                content_type,
                ALLOWED_PHOTO_TYPES.join(", ")
            )));
        }

        Ok(())
    }
}

/// Human-readable byte count, whole units only
fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{} KB", bytes / KB)
    } else {
        format!("{} bytes", bytes)
    }
}

#[async_trait]
impl PhotoStore for InlinePhotoStore {
    async fn store(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<StoredPhoto> {
        let content_type = content_type.trim().to_lowercase();
        self.check(&content_type, &data).inspect_err(|e| {
            tracing::debug!("Rejected photo {}: {}", file_name, e);
        })?;

        let digest = hex::encode(Sha256::digest(&data));
        let reference = format!(
            "data:{};base64,{}",
            content_type,
            BASE64_STANDARD.encode(&data)
        );

        tracing::debug!(
            "Stored photo {} ({} bytes, sha256 {})",
            file_name,
            data.len(),
            digest
        );

        Ok(StoredPhoto {
            reference,
            digest,
            content_type,
            size: data.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_embeds_photo_with_digest() {
        let store = InlinePhotoStore::new(1024);
        let photo = store
            .store("pothole.png", "image/PNG", b"abc".to_vec())
            .await
            .unwrap();

        assert_eq!(photo.reference, "data:image/png;base64,YWJj");
        assert_eq!(
            photo.digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(photo.size, 3);
    }

    #[tokio::test]
    async fn test_store_rejects_bad_input() {
        let store = InlinePhotoStore::new(4);

        for (content_type, data) in [
            ("image/jpeg", Vec::new()),
            ("image/jpeg", vec![0u8; 5]),
            ("application/pdf", vec![0u8; 2]),
        ] {
            assert!(matches!(
                store.store("f", content_type, data).await,
                Err(AppError::UploadFailed(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_size_limit_message_uses_readable_units() {
        for (limit, expected) in [
            (4, "Maximum size is 4 bytes"),
            (1024, "Maximum size is 1 KB"),
            (5 * 1024 * 1024, "Maximum size is 5 MB"),
        ] {
            let store = InlinePhotoStore::new(limit);
            match store.store("big.png", "image/png", vec![0u8; limit + 1]).await {
                Err(AppError::UploadFailed(message)) => assert!(
                    message.ends_with(expected),
                    "unexpected message: {}",
                    message
                ),
                other => panic!("expected UploadFailed, got {:?}", other),
            }
        }
    }
}
