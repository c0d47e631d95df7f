use crate::config::Config;
use crate::ingest::Ingestor;
use crate::provider::ProviderClient;
use crate::storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub provider: Arc<ProviderClient>,
    pub storage: Arc<Storage>,
    pub ingestor: Arc<Ingestor>,
}

// API Request/Response types

#[derive(Debug, serde::Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_size")]
    pub size: String,
    #[serde(default = "default_quality")]
    pub quality: String,
    #[serde(default = "default_count")]
    pub n: u32,
}

fn default_model() -> String {
    "img3".to_string()
}

fn default_size() -> String {
    "1024x1024".to_string()
}

fn default_quality() -> String {
    "standard".to_string()
}

fn default_count() -> u32 {
    1
}

/// One persisted image as reported back from `/api/generate`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SavedImage {
    pub filename: String,
    pub url: String,
    pub prompt: String,
    pub model: String,
    pub timestamp: String,
    pub storage: String,
}

#[derive(Debug, serde::Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub images: Vec<SavedImage>,
    pub message: String,
}

#[derive(Debug, serde::Serialize)]
pub struct StorageInfoResponse {
    pub storage_type: String,
    pub bucket_name: Option<String>,
    pub region: Option<String>,
    pub s3_configured: bool,
    pub use_s3: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_defaults() {
        let req: GenerateRequest =
            serde_json::from_str(r#"{"prompt": "a red fox"}"#).unwrap();
        assert_eq!(req.prompt, "a red fox");
        assert_eq!(req.model, "img3");
        assert_eq!(req.size, "1024x1024");
        assert_eq!(req.quality, "standard");
        assert_eq!(req.n, 1);
    }

    #[test]
    fn generate_request_missing_prompt_is_empty() {
        let req: GenerateRequest = serde_json::from_str(r#"{"model": "img4"}"#).unwrap();
        assert!(req.prompt.is_empty());
        assert_eq!(req.model, "img4");
    }
}
