//! S3 storage variant. Objects live under the `images/` prefix and rely on
//! bucket policy for public visibility; no ACL is applied per object.

use super::{has_image_extension, ImageStore, Locator, StoreError, StoredImage};
use crate::config::StorageConfig;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::info;

const KEY_PREFIX: &str = "images/";

#[derive(Debug)]
pub struct S3Store {
    bucket: Box<Bucket>,
    bucket_name: String,
    region: String,
    endpoint: Option<String>,
}

impl S3Store {
    pub fn new(config: &StorageConfig) -> Result<Self, StoreError> {
        let (Some(access_key), Some(secret_key), Some(bucket_name)) = (
            config.s3_access_key_id.as_deref(),
            config.s3_secret_access_key.as_deref(),
            config.s3_bucket.as_deref(),
        ) else {
            return Err(StoreError::Backend(
                "missing S3 credentials or bucket name".to_string(),
            ));
        };

        let credentials = Credentials::new(Some(access_key), Some(secret_key), None, None, None)
            .map_err(|e| StoreError::Backend(format!("invalid credentials: {e}")))?;

        let region = match &config.s3_endpoint {
            Some(endpoint) => Region::Custom {
                region: config.s3_region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .s3_region
                .parse()
                .map_err(|e| StoreError::Backend(format!("invalid region: {e}")))?,
        };

        let bucket = Bucket::new(bucket_name, region, credentials)
            .map_err(|e| StoreError::Backend(format!("failed to open bucket: {e}")))?;
        // Custom endpoints (MinIO and friends) want path-style addressing.
        let bucket = if config.s3_endpoint.is_some() {
            bucket.with_path_style()
        } else {
            bucket
        };

        Ok(Self {
            bucket: Box::new(bucket),
            bucket_name: bucket_name.to_string(),
            region: config.s3_region.clone(),
            endpoint: config.s3_endpoint.clone(),
        })
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Base URL under which stored objects are publicly reachable.
    pub fn public_url_prefix(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                self.bucket_name,
                KEY_PREFIX.trim_end_matches('/')
            ),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket_name,
                self.region,
                KEY_PREFIX.trim_end_matches('/')
            ),
        }
    }

    fn public_url(&self, filename: &str) -> String {
        format!("{}/{}", self.public_url_prefix(), filename)
    }
}

#[async_trait]
impl ImageStore for S3Store {
    async fn store(
        &self,
        data: &[u8],
        filename: &str,
        content_type: &str,
    ) -> Result<Locator, StoreError> {
        let key = format!("{KEY_PREFIX}{filename}");
        let response = self
            .bucket
            .put_object_with_content_type(&key, data, content_type)
            .await
            .map_err(|e| StoreError::Backend(format!("put_object failed: {e}")))?;

        let status = response.status_code();
        if status != 200 {
            return Err(StoreError::Backend(format!(
                "put_object returned status {status}"
            )));
        }

        let url = self.public_url(filename);
        info!("Image uploaded to S3: {}", url);
        Ok(Locator::Url(url))
    }

    async fn list(&self) -> Result<Vec<StoredImage>, StoreError> {
        let pages = self
            .bucket
            .list(KEY_PREFIX.to_string(), None)
            .await
            .map_err(|e| StoreError::Backend(format!("list_objects failed: {e}")))?;

        let mut images: Vec<(Option<DateTime<FixedOffset>>, StoredImage)> = Vec::new();
        for page in pages {
            for object in page.contents {
                let filename = match object.key.strip_prefix(KEY_PREFIX) {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => continue,
                };
                if !has_image_extension(&filename) {
                    continue;
                }

                let last_modified = DateTime::parse_from_rfc3339(&object.last_modified).ok();
                let timestamp = last_modified
                    .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| object.last_modified.clone());

                images.push((
                    last_modified,
                    StoredImage {
                        url: self.public_url(&filename),
                        filename,
                        timestamp,
                        size: object.size,
                    },
                ));
            }
        }

        // Newest first; unparseable timestamps sink to the end.
        images.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(images.into_iter().map(|(_, img)| img).collect())
    }
}
