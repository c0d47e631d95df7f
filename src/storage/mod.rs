//! Storage backends for generated images.
//!
//! Two interchangeable variants behind one capability trait: local disk and
//! an S3 bucket. The variant is picked once at startup from `StorageConfig`
//! and never re-evaluated per request. When the S3 variant rejects a write,
//! `Storage::save` falls back to the local variant for that one image.

pub mod local;
pub mod s3;

use crate::config::StorageConfig;
use async_trait::async_trait;
use std::fmt;
use tracing::{info, warn};

pub use local::LocalStore;
pub use s3::S3Store;

const IMAGE_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".gif"];

pub(crate) fn has_image_extension(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Opaque reference to a persisted image: a route path for local files, a
/// fully-qualified public URL for bucket objects.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum Locator {
    Route(String),
    Url(String),
}

impl Locator {
    pub fn as_str(&self) -> &str {
        match self {
            Locator::Route(s) | Locator::Url(s) => s,
        }
    }

    pub fn storage_label(&self) -> &'static str {
        match self {
            Locator::Route(_) => "Local",
            Locator::Url(_) => "S3",
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One image as listed by a backend. Never mutated after creation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoredImage {
    pub filename: String,
    pub url: String,
    pub timestamp: String,
    pub size: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The object store rejected the call; the local variant may still work.
    #[error("object store error: {0}")]
    Backend(String),

    /// Local filesystem failure. Nothing further to try.
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StoreError::Backend(_))
    }
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(
        &self,
        data: &[u8],
        filename: &str,
        content_type: &str,
    ) -> Result<Locator, StoreError>;

    async fn list(&self) -> Result<Vec<StoredImage>, StoreError>;
}

/// Facade over the active backend. Holds the local variant unconditionally
/// so S3 write failures can fall back to disk.
pub struct Storage {
    local: LocalStore,
    s3: Option<S3Store>,
    config: StorageConfig,
}

impl Storage {
    /// Select the backend from config. A failed S3 client construction
    /// degrades the process to local mode, matching the startup log line.
    pub fn new(config: StorageConfig) -> Self {
        let s3 = if config.s3_enabled() {
            match S3Store::new(&config) {
                Ok(store) => {
                    info!("S3 client initialized. Using bucket: {}", store.bucket_name());
                    info!("S3 URL format: {}/", store.public_url_prefix());
                    Some(store)
                }
                Err(e) => {
                    warn!("Failed to initialize S3 client: {}", e);
                    None
                }
            }
        } else {
            info!("Using local storage (S3 not configured)");
            None
        };

        Self {
            local: LocalStore::new(&config.media_dir),
            s3,
            config,
        }
    }

    fn primary(&self) -> &dyn ImageStore {
        match &self.s3 {
            Some(s3) => s3,
            None => &self.local,
        }
    }

    pub fn s3_active(&self) -> bool {
        self.s3.is_some()
    }

    pub fn storage_type(&self) -> &'static str {
        if self.s3_active() {
            "AWS S3"
        } else {
            "Local Storage"
        }
    }

    pub fn bucket_name(&self) -> Option<&str> {
        self.s3.as_ref().map(|s3| s3.bucket_name())
    }

    pub fn region(&self) -> Option<&str> {
        self.s3_active().then_some(self.config.s3_region.as_str())
    }

    pub fn use_s3_flag(&self) -> bool {
        self.config.use_s3
    }

    /// Persist one image through the active backend. A recoverable S3
    /// failure retries on local disk before giving up.
    pub async fn save(
        &self,
        data: &[u8],
        filename: &str,
        content_type: &str,
    ) -> Result<Locator, StoreError> {
        match self.primary().store(data, filename, content_type).await {
            Ok(locator) => Ok(locator),
            Err(e) if e.is_recoverable() => {
                warn!("S3 upload failed, falling back to local storage: {}", e);
                self.local.store(data, filename, content_type).await
            }
            Err(e) => Err(e),
        }
    }

    /// Enumerate stored images, newest first.
    pub async fn list(&self) -> Result<Vec<StoredImage>, StoreError> {
        self.primary().list().await
    }
}
