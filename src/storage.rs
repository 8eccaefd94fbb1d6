use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::{AppError, Result};

/// Allowed screenshot extensions
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "pdf"];

/// Keeps payment screenshots and hands back an opaque reference to them.
#[async_trait]
pub trait ScreenshotStore: Send + Sync {
    async fn store_screenshot(&self, filename: &str, data: &[u8]) -> Result<String>;
}

/// Writes screenshots to a local directory. References look like
/// `screenshots/<uuid>.<ext>`.
pub struct LocalScreenshotStore {
    uploads_dir: PathBuf,
    max_file_size: usize,
}

impl LocalScreenshotStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            uploads_dir: PathBuf::from(&config.uploads_dir),
            max_file_size: config.max_file_size_bytes,
        }
    }
}

#[async_trait]
impl ScreenshotStore for LocalScreenshotStore {
    async fn store_screenshot(&self, filename: &str, data: &[u8]) -> Result<String> {
        if data.is_empty() {
            return Err(AppError::InvalidArgument("Screenshot is empty".to_string()));
        }

        if data.len() > self.max_file_size {
            return Err(AppError::InvalidArgument(format!(
                "Screenshot too large (max {} bytes)",
                self.max_file_size
            )));
        }

        // Extract and validate extension
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .ok_or_else(|| AppError::InvalidArgument("Invalid filename".to_string()))?;

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::InvalidArgument(format!(
                "Invalid file type. Allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }

        let dir = self.uploads_dir.join("screenshots");
        fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::Internal(format!("Failed to create screenshots directory: {}", e))
        })?;

        let new_filename = format!("{}.{}", Uuid::new_v4(), extension);
        let mut file = fs::File::create(dir.join(&new_filename)).await.map_err(|e| {
            AppError::Internal(format!("Failed to create file: {}", e))
        })?;

        file.write_all(data).await.map_err(|e| {
            AppError::Internal(format!("Failed to write file: {}", e))
        })?;
        file.flush().await.map_err(|e| {
            AppError::Internal(format!("Failed to write file: {}", e))
        })?;

        tracing::debug!("Stored payment screenshot {}", new_filename);

        Ok(format!("screenshots/{}", new_filename))
    }
}
