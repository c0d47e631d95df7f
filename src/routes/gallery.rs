use crate::models::{AppState, StorageInfoResponse};
use crate::storage::StoredImage;
use axum::{
    extract::State,
    response::Html,
    routing::get,
    Json, Router,
};
use tracing::error;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/gallery", get(gallery))
        .route("/api/storage-info", get(api_storage_info))
        .with_state(state)
}

/// HTML gallery of stored images, newest first. A listing failure renders
/// the same page with an empty grid and an error note rather than a 500.
async fn gallery(State(state): State<AppState>) -> Html<String> {
    match state.storage.list().await {
        Ok(images) => Html(render_gallery(&state, &images, None)),
        Err(e) => {
            error!("Error listing gallery images: {}", e);
            Html(render_gallery(&state, &[], Some(&e.to_string())))
        }
    }
}

async fn api_storage_info(State(state): State<AppState>) -> Json<StorageInfoResponse> {
    Json(StorageInfoResponse {
        storage_type: state.storage.storage_type().to_string(),
        bucket_name: state.storage.bucket_name().map(String::from),
        region: state.storage.region().map(String::from),
        s3_configured: state.storage.s3_active(),
        use_s3: state.storage.s3_active(),
    })
}

fn render_gallery(state: &AppState, images: &[StoredImage], error: Option<&str>) -> String {
    let mut items = String::new();
    for image in images {
        items.push_str(&format!(
            r#"    <figure class="item">
      <a href="{url}" target="_blank"><img src="{url}" alt="{name}" loading="lazy" /></a>
      <figcaption>{name}<br /><small>{timestamp} &middot; {size} bytes</small></figcaption>
    </figure>
"#,
            url = escape_html(&image.url),
            name = escape_html(&image.filename),
            timestamp = escape_html(&image.timestamp),
            size = image.size,
        ));
    }

    let banner = match state.storage.bucket_name() {
        Some(bucket) => format!(
            "{} &middot; bucket: {} &middot; {} image(s)",
            state.storage.storage_type(),
            escape_html(bucket),
            images.len()
        ),
        None => format!(
            "{} &middot; {} image(s)",
            state.storage.storage_type(),
            images.len()
        ),
    };

    let error_note = match error {
        Some(msg) => format!(
            r#"  <p class="error">Could not load images: {}</p>
"#,
            escape_html(msg)
        ),
        None if images.is_empty() => String::from(
            r#"  <p>No images yet. <a href="/">Generate some!</a></p>
"#,
        ),
        None => String::new(),
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Atelier - Gallery</title>
  <style>
    body {{ font-family: Arial, sans-serif; margin: 2rem; color: #1d1d1f; }}
    nav a {{ margin-right: 1rem; }}
    .banner {{ background: #f6f8fa; border: 1px solid #ddd; border-radius: 8px; padding: 0.75rem 1rem; margin: 1rem 0; }}
    .grid {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 1rem; }}
    .item {{ margin: 0; }}
    .item img {{ width: 100%; border-radius: 6px; }}
    figcaption {{ font-size: 0.85rem; margin-top: 0.25rem; word-break: break-all; }}
    .error {{ color: #b00020; }}
  </style>
</head>
<body>
  <h1>Gallery</h1>
  <nav><a href="/">Generate</a><a href="/gallery">Gallery</a></nav>
  <div class="banner">{banner}</div>
{error_note}  <div class="grid">
{items}  </div>
</body>
</html>"#,
    )
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
