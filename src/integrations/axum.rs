//! Axum framework integration.
//!
//! This module exposes the document service over HTTP.
//!
//! # Setup
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! pdf-template-service = { version = "0.1", features = ["axum-integration"] }
//! axum = "0.8"
//! ```
//!
//! # Routes
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | `POST` | `/generate-pdf` | `multipart/form-data`: `template_file`, `data` | `application/pdf` |
//! | `GET` | `/health` | - | JSON [`HealthResponse`] |
//!
//! Any other method on these paths answers `405 Method not allowed`.
//!
//! # Status Mapping
//!
//! | Failure | Status | Body |
//! |---------|--------|------|
//! | Malformed multipart | 400 | `Failed to parse multipart form: …` |
//! | No `template_file` part | 400 | `Failed to get template file: …` |
//! | No or empty `data` part | 400 | `Data field is required` |
//! | `data` not a JSON object | 400 | `Invalid JSON data: …` |
//! | Validation / template error | 400 | the error message |
//! | Browser error | 500 | `Failed to generate PDF: …` |
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use pdf_template_service::integrations::axum::{router, AppState};
//! use pdf_template_service::{DocumentService, DocumentServiceConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = DocumentServiceConfig::default();
//!     let service = DocumentService::from_config(&config);
//!
//!     let app = router(AppState::new(service, config.max_concurrent_renders));
//!
//!     let listener = tokio::net::TcpListener::bind(&config.bind_addr).await.unwrap();
//!     axum::serve(listener, app)
//!         .with_graceful_shutdown(shutdown_signal())
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! # Concurrency
//!
//! Each conversion starts its own browser. [`AppState`] carries a semaphore so
//! that at most `max_concurrent_renders` conversions run at once; further
//! requests wait for a permit after their upload has been read. A permit is
//! held until the browser has actually stopped, even when the request already
//! answered with a timeout.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Map, Value};
use tokio::signal;
use tokio::sync::Semaphore;

use crate::error::DocumentError;
use crate::service::{DEFAULT_DOCUMENT_NAME, DocumentRequest, DocumentService, HealthResponse};

/// Path of the conversion endpoint.
pub const GENERATE_PDF_PATH: &str = "/generate-pdf";

/// Path of the health endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Largest accepted request body (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 << 20;

/// Multipart part holding the HTML template.
pub const TEMPLATE_FIELD: &str = "template_file";

/// Multipart part holding the JSON data.
pub const DATA_FIELD: &str = "data";

/// Shared state for the routes.
///
/// Cheap to clone; every clone shares the same service and permit pool.
#[derive(Clone)]
pub struct AppState {
    service: Arc<DocumentService>,
    limiter: Arc<Semaphore>,
}

impl AppState {
    /// Wrap `service`, allowing `max_concurrent_renders` conversions at once.
    ///
    /// A value of zero is treated as one.
    pub fn new(service: DocumentService, max_concurrent_renders: usize) -> Self {
        Self::from_shared(Arc::new(service), max_concurrent_renders)
    }

    /// Same as [`new`](Self::new) for a service that is already shared.
    pub fn from_shared(service: Arc<DocumentService>, max_concurrent_renders: usize) -> Self {
        Self {
            service,
            limiter: Arc::new(Semaphore::new(max_concurrent_renders.max(1))),
        }
    }

    /// The underlying service.
    pub fn service(&self) -> &Arc<DocumentService> {
        &self.service
    }

    /// Conversions that could start right now without waiting.
    pub fn available_permits(&self) -> usize {
        self.limiter.available_permits()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.service)
            .field("available_permits", &self.limiter.available_permits())
            .finish()
    }
}

/// Build the router with all routes and the upload limit applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            GENERATE_PDF_PATH,
            post(generate_pdf_handler)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
                .fallback(method_not_allowed),
        )
        .route(HEALTH_PATH, get(health_handler).fallback(method_not_allowed))
        .with_state(state)
}

/// `POST /generate-pdf`
///
/// Reads the `template_file` and `data` parts, runs the pipeline and answers
/// with the PDF as an attachment.
pub async fn generate_pdf_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let request = match read_upload(multipart).await {
        Ok(request) => request,
        Err(message) => {
            log::warn!("Rejected upload: {}", message);
            return (StatusCode::BAD_REQUEST, message).into_response();
        }
    };

    // Owned so it can travel with the browser work and outlive a timeout.
    let permit = match Arc::clone(&state.limiter).acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            log::error!("❌ Render limiter closed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate PDF: {}", e),
            )
                .into_response();
        }
    };

    match state.service.generate_pdf_with_guard(request, permit).await {
        Ok(pdf) => pdf_response(pdf),
        Err(e) => error_response(&e),
    }
}

/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Answer for a known path with the wrong method.
pub async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Map a pipeline error to a plain-text response.
///
/// Client errors carry their own message with 400; everything else is a 500
/// prefixed with `Failed to generate PDF: `.
pub fn error_response(error: &DocumentError) -> Response {
    if error.is_client_error() {
        log::warn!("Request rejected [{}]: {}", error.error_code(), error);
        (StatusCode::BAD_REQUEST, error.to_string()).into_response()
    } else {
        log::error!("❌ PDF generation failed [{}]: {}", error.error_code(), error);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to generate PDF: {}", error),
        )
            .into_response()
    }
}

/// `Content-Disposition` value for a download named `<name>.pdf`.
pub fn content_disposition(name: &str) -> String {
    format!("attachment; filename={}.pdf", name)
}

fn pdf_response(pdf: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(DEFAULT_DOCUMENT_NAME),
            ),
        ],
        pdf,
    )
        .into_response()
}

/// Pull the template and data out of the multipart body.
///
/// Template problems are reported before data problems.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<DocumentRequest, String> {
    let mut multipart =
        multipart.map_err(|e| format!("Failed to parse multipart form: {}", e.body_text()))?;

    let mut template: Option<String> = None;
    let mut data: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(format!("Failed to parse multipart form: {}", e.body_text())),
        };

        match field.name() {
            Some(TEMPLATE_FIELD) if template.is_none() => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to parse multipart form: {}", e.body_text()))?;
                // Invalid UTF-8 sequences become U+FFFD.
                template = Some(String::from_utf8_lossy(&bytes).into_owned());
            }
            Some(DATA_FIELD) if data.is_none() => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to parse multipart form: {}", e.body_text()))?;
                data = Some(text);
            }
            _ => {}
        }
    }

    let html_template = match template {
        Some(html) => html,
        None => return Err("Failed to get template file: no such file".to_string()),
    };

    let data = match data {
        Some(text) if !text.is_empty() => text,
        _ => return Err("Data field is required".to_string()),
    };

    // `null` parses to None and is rejected by the service as missing data.
    let data: Option<Map<String, Value>> =
        serde_json::from_str(&data).map_err(|e| format!("Invalid JSON data: {}", e))?;

    Ok(DocumentRequest::new(html_template, data))
}

/// Resolves on Ctrl+C or SIGTERM, for `axum::serve(..).with_graceful_shutdown`.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("❌ Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("❌ Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::info!("Shutdown signal received, draining in-flight requests");
}
