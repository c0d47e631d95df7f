use crate::ingest::{generate_filename, request_timestamp};
use crate::models::{AppState, GenerateRequest, GenerateResponse, SavedImage};
use crate::provider::ModelList;
use crate::types::{AppError, AppResult};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/models", get(api_models))
        .route("/api/generate", post(api_generate))
        .with_state(state)
}

async fn api_models(State(state): State<AppState>) -> Json<ModelList> {
    Json(state.provider.list_models().await)
}

async fn api_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> AppResult<Json<GenerateResponse>> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::InvalidRequest("Prompt is required".to_string()));
    }

    info!(model = %request.model, "Generating image");

    let result = state
        .provider
        .generate(
            &request.prompt,
            &request.model,
            &request.size,
            &request.quality,
            request.n,
        )
        .await
        .ok_or_else(|| AppError::Provider("Failed to generate image".to_string()))?;

    let timestamp = request_timestamp();
    let mut saved_images = Vec::new();

    for (i, entry) in result.data.iter().enumerate() {
        let filename = generate_filename(&timestamp, i + 1);

        let locator = if let Some(url) = &entry.url {
            state
                .ingestor
                .save_from_url(&state.storage, url, &filename)
                .await
        } else if let Some(b64) = &entry.b64_json {
            state
                .ingestor
                .save_base64(&state.storage, b64, &filename)
                .await
        } else {
            // Entry carries neither a URL nor inline data; skip it.
            continue;
        };

        if let Some(locator) = locator {
            saved_images.push(SavedImage {
                filename,
                url: locator.to_string(),
                prompt: request.prompt.clone(),
                model: request.model.clone(),
                timestamp: timestamp.clone(),
                storage: locator.storage_label().to_string(),
            });
        }
    }

    let message = format!("Generated {} image(s) successfully!", saved_images.len());
    info!("{}", message);

    Ok(Json(GenerateResponse {
        success: true,
        images: saved_images,
        message,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ProviderConfig, ServerConfig, StorageConfig};
    use crate::ingest::Ingestor;
    use crate::provider::ProviderClient;
    use crate::storage::Storage;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state(provider_url: &str, media_dir: &TempDir) -> AppState {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            provider: ProviderConfig {
                base_url: provider_url.to_string(),
                api_key: "test-key".to_string(),
            },
            storage: StorageConfig {
                media_dir: media_dir.path().to_string_lossy().into_owned(),
                use_s3: false,
                s3_bucket: None,
                s3_region: "us-east-1".to_string(),
                s3_access_key_id: None,
                s3_secret_access_key: None,
                s3_endpoint: None,
            },
        };
        AppState {
            provider: Arc::new(ProviderClient::new(&config.provider)),
            storage: Arc::new(Storage::new(config.storage.clone())),
            ingestor: Arc::new(Ingestor::new()),
            config,
        }
    }

    async fn post_generate(state: AppState, body: &str) -> (StatusCode, serde_json::Value) {
        let response = router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/generate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected_without_calling_provider() {
        let mut server = mockito::Server::new_async().await;
        // Provider mock expects zero calls.
        let mock = server
            .mock("POST", "/v1/images/generations")
            .expect(0)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let state = test_state(&server.url(), &dir);

        for body in [r#"{"prompt": ""}"#, r#"{"prompt": "   "}"#, r#"{}"#] {
            let (status, json) = post_generate(state.clone(), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"], "Prompt is required");
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn provider_failure_maps_to_500() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/images/generations")
            .with_status(503)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let state = test_state(&server.url(), &dir);

        let (status, json) = post_generate(state, r#"{"prompt": "a red fox"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Failed to generate image");
    }

    #[tokio::test]
    async fn successful_generation_persists_and_reports_each_image() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/out/1.png")
            .with_status(200)
            .with_body("first")
            .create_async()
            .await;
        let provider_body = format!(
            r#"{{"data": [{{"url": "{}/out/1.png"}}, {{"b64_json": "c2Vjb25k"}}, {{}}]}}"#,
            server.url()
        );
        server
            .mock("POST", "/v1/images/generations")
            .with_status(200)
            .with_body(provider_body)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let state = test_state(&server.url(), &dir);

        let (status, json) =
            post_generate(state, r#"{"prompt": "a red fox", "model": "img3"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        // Entry without url or b64_json is skipped.
        assert_eq!(json["images"].as_array().unwrap().len(), 2);
        assert_eq!(json["message"], "Generated 2 image(s) successfully!");

        let first = &json["images"][0];
        assert_eq!(first["prompt"], "a red fox");
        assert_eq!(first["model"], "img3");
        assert_eq!(first["storage"], "Local");
        let filename = first["filename"].as_str().unwrap();
        assert!(filename.ends_with("_1.png"));
        assert_eq!(first["url"], format!("/media/{filename}"));

        let second = &json["images"][1];
        assert_ne!(second["filename"], first["filename"]);
        assert!(second["filename"].as_str().unwrap().ends_with("_2.png"));

        // Both images really landed on disk.
        assert_eq!(
            std::fs::read(dir.path().join(filename)).unwrap(),
            b"first"
        );
        assert_eq!(
            std::fs::read(dir.path().join(second["filename"].as_str().unwrap())).unwrap(),
            b"second"
        );
    }

    #[tokio::test]
    async fn models_endpoint_passes_provider_list_through() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/models")
            .with_status(200)
            .with_body(r#"{"data": [{"id": "img3", "tier": "free"}]}"#)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let state = test_state(&server.url(), &dir);

        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/models")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["data"][0]["id"], "img3");
    }
}
