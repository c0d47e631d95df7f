//! Image ingestion: normalize a provider result (fetchable URL or inline
//! base64 payload) into raw bytes and hand it to the storage backend.
//!
//! Both entry points return `None` on failure; the generate route just drops
//! that image from the result set, matching the one-bad-image-degrades
//! contract of the API.

use crate::storage::{Locator, Storage};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::error;

const DEFAULT_CONTENT_TYPE: &str = "image/png";

/// Generate a gallery filename: `{YYYYMMDD_HHMMSS}_{8-hex}_{index}.png`.
/// Uniqueness is advisory only; there is no collision detection.
pub fn generate_filename(timestamp: &str, index: usize) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    let suffix = &hex[..8];
    format!("{timestamp}_{suffix}_{index}.png")
}

/// Timestamp component shared by every filename of one generate request.
pub fn request_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

pub struct Ingestor {
    client: reqwest::Client,
}

impl Ingestor {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Download the image and persist it. Fetch failures return `None`.
    pub async fn save_from_url(
        &self,
        storage: &Storage,
        image_url: &str,
        filename: &str,
    ) -> Option<Locator> {
        let response = match self.client.get(image_url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Error fetching image from {}: {}", image_url, e);
                return None;
            }
        };

        if !response.status().is_success() {
            error!(
                "Error fetching image from {}: status {}",
                image_url,
                response.status()
            );
            return None;
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Error reading image body: {}", e);
                return None;
            }
        };

        self.persist(storage, &bytes, filename).await
    }

    /// Decode a base64 payload (with or without a `data:image/...;base64,`
    /// prefix) and persist it. Decode failures return `None`.
    pub async fn save_base64(
        &self,
        storage: &Storage,
        encoded: &str,
        filename: &str,
    ) -> Option<Locator> {
        let payload = strip_data_url_prefix(encoded);
        let bytes = match BASE64.decode(payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Error decoding base64 image: {}", e);
                return None;
            }
        };

        self.persist(storage, &bytes, filename).await
    }

    async fn persist(&self, storage: &Storage, data: &[u8], filename: &str) -> Option<Locator> {
        match storage.save(data, filename, DEFAULT_CONTENT_TYPE).await {
            Ok(locator) => Some(locator),
            Err(e) => {
                error!("Error saving image {}: {}", filename, e);
                None
            }
        }
    }
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_data_url_prefix(encoded: &str) -> &str {
    if encoded.starts_with("data:image") {
        encoded.split_once(',').map(|(_, rest)| rest).unwrap_or(encoded)
    } else {
        encoded
    }
}
