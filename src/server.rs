//! HTTP surface – `POST /generate` turns url-encoded parameters into a PDF.
//!
//! Parameters are accepted from the query string, from an
//! `application/x-www-form-urlencoded` body, or from both at once.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, FromRequest, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::Error;
use crate::fonts::EmbeddedFont;
use crate::pipeline::generate_pdf;
use crate::request::GenerationRequest;

/// File name advertised in `Content-Disposition`.
pub const PDF_FILENAME: &str = "TextDocument.pdf";

/// Shared application state: the font loaded and validated at startup.
#[derive(Clone)]
pub struct AppState {
    font: Arc<EmbeddedFont>,
}

impl AppState {
    pub fn new(font: EmbeddedFont) -> Self {
        Self {
            font: Arc::new(font),
        }
    }
}

/// Failures surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Generation(#[from] Error),

    #[error(transparent)]
    Body(#[from] BytesRejection),

    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            // Keeps axum's own status, e.g. 413 for oversized bodies.
            ApiError::Body(rejection) => return rejection.into_response(),
            ApiError::Generation(e) if e.is_client_error() => {
                (StatusCode::BAD_REQUEST, "InvalidRequest", e.to_string())
            }
            other => {
                log::error!("PDF generation failed: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "failed to generate PDF".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Extractor merging query-string and url-encoded body parameters into a
/// [`GenerationRequest`].
pub struct GenerationParams(pub GenerationRequest);

impl<S> FromRequest<S> for GenerationParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = req.uri().query().unwrap_or_default().to_owned();
        let form_body = is_form_encoded(req.headers());
        let body = Bytes::from_request(req, state).await?;

        let mut encoded = query;
        if form_body && !body.is_empty() {
            let body = std::str::from_utf8(&body).map_err(|e| {
                Error::InvalidRequest(format!("form body is not valid UTF-8: {e}"))
            })?;
            if !encoded.is_empty() {
                encoded.push('&');
            }
            encoded.push_str(body);
        }

        Ok(GenerationParams(GenerationRequest::from_urlencoded(&encoded)?))
    }
}

fn is_form_encoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

/// Build the router with every route and layer.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .with_state(state)
}

/// Bind, serve until Ctrl-C, then drain in-flight requests.
pub async fn serve(config: ServerConfig, font: EmbeddedFont) -> std::io::Result<()> {
    let app = router(AppState::new(font), &config);
    let listener = TcpListener::bind(config.bind).await?;
    log::info!("Listening on {}", listener.local_addr()?);
    log::info!("  - POST /generate");
    log::info!("  - GET  /healthz");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for Ctrl-C, running until killed: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}

async fn generate(
    State(state): State<AppState>,
    GenerationParams(request): GenerationParams,
) -> Result<Response, ApiError> {
    log::info!(
        "Generating PDF: {} chars, fontSize={}, alignment={}",
        request.content.chars().count(),
        request.font_size,
        request.alignment
    );

    // Layout and rendering are CPU-bound; keep them off the async workers.
    let font = Arc::clone(&state.font);
    let (bytes, layout) =
        tokio::task::spawn_blocking(move || generate_pdf(&request, &font)).await??;

    log::info!(
        "Generated {} page(s), {} bytes",
        layout.page_count(),
        bytes.len()
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename={PDF_FILENAME}"),
        )
        .header(header::CONTENT_LENGTH, bytes.len())
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn form_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_form_encoded(&headers));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
        );
        assert!(is_form_encoded(&headers));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(!is_form_encoded(&headers));
    }

    #[test]
    fn client_errors_map_to_400() {
        let resp = ApiError::from(Error::InvalidRequest("missing field `content`".into()))
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_map_to_500() {
        let resp = ApiError::from(Error::FontLoad("gone".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
