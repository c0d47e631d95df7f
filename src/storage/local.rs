//! Local-filesystem storage variant. Images live flat in the media dir and
//! are served back through the `/media/{filename}` route.

use super::{has_image_extension, ImageStore, Locator, StoreError, StoredImage};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

pub struct LocalStore {
    media_dir: PathBuf,
}

impl LocalStore {
    pub fn new(media_dir: impl AsRef<Path>) -> Self {
        Self {
            media_dir: media_dir.as_ref().to_path_buf(),
        }
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }
}

#[async_trait]
impl ImageStore for LocalStore {
    async fn store(
        &self,
        data: &[u8],
        filename: &str,
        _content_type: &str,
    ) -> Result<Locator, StoreError> {
        let path = self.media_dir.join(filename);
        tokio::fs::write(&path, data).await?;
        debug!(path = %path.display(), "Image written to local storage");
        Ok(Locator::Route(format!("/media/{filename}")))
    }

    async fn list(&self) -> Result<Vec<StoredImage>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.media_dir).await {
            Ok(entries) => entries,
            // A missing media dir is an empty gallery, not a failure.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut images: Vec<(SystemTime, StoredImage)> = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let filename = entry.file_name().to_string_lossy().into_owned();
            if !has_image_extension(&filename) {
                continue;
            }

            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified()?;
            let timestamp = DateTime::<Local>::from(modified)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string();

            images.push((
                modified,
                StoredImage {
                    url: format!("/media/{filename}"),
                    filename,
                    timestamp,
                    size: metadata.len(),
                },
            ));
        }

        // Newest first, by real mtime rather than the formatted string.
        images.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(images.into_iter().map(|(_, img)| img).collect())
    }
}
