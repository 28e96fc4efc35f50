//! HTTP surface: router, handlers, and response envelopes.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, HeaderName, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::error::RelayError;
use crate::ports::{ImageTransformer, TransformRequest};
use crate::upload::{self, UploadPolicy};

/// Shared per-process state handed to every request.
#[derive(Clone)]
pub struct AppState {
    /// Upload intake rules.
    pub policy: Arc<UploadPolicy>,
    /// The configured provider adapter.
    pub transformer: Arc<dyn ImageTransformer>,
}

/// Success envelope for a generated image.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Always `true`.
    pub success: bool,
    /// URL of the generated image at the provider.
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    /// Human-readable status message.
    pub message: String,
}

/// Body of the health endpoint.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Fixed liveness message.
    pub status: String,
    /// Current time, ISO-8601.
    pub timestamp: String,
}

/// Build the application router.
///
/// The body limit leaves headroom above the upload cap for multipart
/// framing; oversize files inside an accepted body are still rejected by
/// the explicit intake check.
pub fn app(state: AppState) -> Router {
    let body_limit =
        usize::try_from(state.policy.max_bytes).unwrap_or(usize::MAX).saturating_add(1024 * 1024);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ]);

    Router::new()
        .route("/health", get(health))
        .route("/generate-fitness-image", post(generate_fitness_image))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Server is running!".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Relay one upload to the configured provider.
///
/// The scratch file is removed exactly once, right after the provider call,
/// on both the success and the failure path; intake errors clean up after
/// themselves before surfacing.
async fn generate_fitness_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, RelayError> {
    let (saved, description) = upload::receive(multipart, &state.policy).await?;
    log::info!(
        "received upload '{}' ({} bytes, {})",
        saved.original_filename,
        saved.size,
        saved.declared_mime
    );

    let request = TransformRequest {
        image_path: saved.path.clone(),
        original_filename: saved.original_filename.clone(),
        declared_mime: saved.declared_mime.clone(),
        description,
    };

    let result = state.transformer.transform(&request).await;
    upload::cleanup(&saved.path).await;

    let image_url = result.inspect_err(|e| log::error!("transformation failed: {e}"))?;
    log::info!("generated image at {image_url}");

    Ok(Json(GenerateResponse {
        success: true,
        image_url,
        message: "Image generated successfully.".to_string(),
    }))
}
