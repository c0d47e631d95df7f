use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub media_dir: String,
    pub use_s3: bool,
    pub s3_bucket: Option<String>,
    pub s3_region: String,
    pub s3_access_key_id: Option<String>,
    pub s3_secret_access_key: Option<String>,
    /// Override for S3-compatible stores (MinIO etc). Empty means AWS.
    pub s3_endpoint: Option<String>,
}

impl StorageConfig {
    /// S3 mode requires the flag plus all three of access key, secret key
    /// and bucket name; anything missing forces local mode.
    pub fn s3_enabled(&self) -> bool {
        self.use_s3
            && self.s3_access_key_id.is_some()
            && self.s3_secret_access_key.is_some()
            && self.s3_bucket.is_some()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()?,
            },
            provider: ProviderConfig {
                base_url: env::var("PROVIDER_BASE_URL")
                    .unwrap_or_else(|_| "https://api.infip.pro".to_string()),
                api_key: env::var("PROVIDER_API_KEY").unwrap_or_default(),
            },
            storage: StorageConfig {
                media_dir: env::var("MEDIA_DIR").unwrap_or_else(|_| "media".to_string()),
                use_s3: env::var("USE_S3")
                    .unwrap_or_else(|_| "false".to_string())
                    .to_lowercase()
                    .parse()?,
                s3_bucket: env::var("S3_BUCKET_NAME").ok(),
                s3_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                s3_access_key_id: env::var("AWS_ACCESS_KEY_ID").ok(),
                s3_secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
                s3_endpoint: env::var("S3_ENDPOINT").ok(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_storage() -> StorageConfig {
        StorageConfig {
            media_dir: "media".to_string(),
            use_s3: true,
            s3_bucket: Some("my-bucket".to_string()),
            s3_region: "us-east-1".to_string(),
            s3_access_key_id: Some("AKIA123".to_string()),
            s3_secret_access_key: Some("secret".to_string()),
            s3_endpoint: None,
        }
    }

    #[test]
    fn s3_enabled_requires_all_values() {
        assert!(base_storage().s3_enabled());

        let mut no_flag = base_storage();
        no_flag.use_s3 = false;
        assert!(!no_flag.s3_enabled());

        let mut no_bucket = base_storage();
        no_bucket.s3_bucket = None;
        assert!(!no_bucket.s3_enabled());

        let mut no_key = base_storage();
        no_key.s3_access_key_id = None;
        assert!(!no_key.s3_enabled());

        let mut no_secret = base_storage();
        no_secret.s3_secret_access_key = None;
        assert!(!no_secret.s3_enabled());
    }
}
