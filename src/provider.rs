// Remote image-generation provider client (OpenAI-compatible API)
//
// Endpoints:
//   GET  {base}/v1/models
//   POST {base}/v1/images/generations
//
// Failures are swallowed here on purpose: the routes degrade to an empty
// model list or a 500, the process never dies over a provider hiccup.

use crate::config::ProviderConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

pub struct ProviderClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerationPayload<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: &'a str,
    n: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub data: Vec<ModelInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub data: Vec<ImageEntry>,
}

/// A single provider result: either a fetchable URL or inline base64 bytes.
#[derive(Debug, Deserialize)]
pub struct ImageEntry {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub b64_json: Option<String>,
}

impl ProviderClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Fetch the available models. Any failure yields an empty list.
    pub async fn list_models(&self) -> ModelList {
        let url = format!("{}/v1/models", self.base_url);

        let response = match self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Error fetching models: {}", e);
                return ModelList::default();
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Error fetching models: {} - {}", status, body);
            return ModelList::default();
        }

        match response.json::<ModelList>().await {
            Ok(models) => models,
            Err(e) => {
                error!("Failed to parse model list: {}", e);
                ModelList::default()
            }
        }
    }

    /// Submit a generation request. Returns `None` on any non-200 status or
    /// transport error; the caller turns that into an HTTP 500.
    pub async fn generate(
        &self,
        prompt: &str,
        model: &str,
        size: &str,
        quality: &str,
        n: u32,
    ) -> Option<GenerationResponse> {
        let url = format!("{}/v1/images/generations", self.base_url);

        let payload = GenerationPayload {
            model,
            prompt,
            size,
            quality,
            n,
        };

        let response = match self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Error generating image: {}", e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Error generating image: {} - {}", status, body);
            return None;
        }

        match response.json::<GenerationResponse>().await {
            Ok(result) => Some(result),
            Err(e) => {
                error!("Failed to parse generation response: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    fn client_for(server: &mockito::Server) -> ProviderClient {
        ProviderClient::new(&ProviderConfig {
            base_url: server.url(),
            api_key: "test-key".to_string(),
        })
    }

    #[tokio::test]
    async fn list_models_parses_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/models")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(r#"{"data": [{"id": "img3", "tier": "free"}, {"id": "img4"}]}"#)
            .create_async()
            .await;

        let models = client_for(&server).list_models().await;
        mock.assert_async().await;
        assert_eq!(models.data.len(), 2);
        assert_eq!(models.data[0].id, "img3");
        assert_eq!(models.data[0].tier.as_deref(), Some("free"));
    }

    #[tokio::test]
    async fn list_models_swallows_server_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/models")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let models = client_for(&server).list_models().await;
        assert!(models.data.is_empty());
    }

    #[tokio::test]
    async fn generate_returns_entries_on_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/images/generations")
            .match_header("authorization", "Bearer test-key")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "model": "img3",
                "prompt": "a red fox",
                "size": "1024x1024",
                "quality": "standard",
                "n": 1
            })))
            .with_status(200)
            .with_body(r#"{"data": [{"url": "http://x/y.png"}]}"#)
            .create_async()
            .await;

        let result = client_for(&server)
            .generate("a red fox", "img3", "1024x1024", "standard", 1)
            .await
            .expect("generation should succeed");
        mock.assert_async().await;
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0].url.as_deref(), Some("http://x/y.png"));
        assert!(result.data[0].b64_json.is_none());
    }

    #[tokio::test]
    async fn generate_returns_none_on_provider_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/images/generations")
            .with_status(503)
            .with_body("service unavailable")
            .create_async()
            .await;

        let result = client_for(&server)
            .generate("a red fox", "img3", "1024x1024", "standard", 1)
            .await;
        assert!(result.is_none());
    }
}
