//! HTTP server for templated PDF generation.
//!
//! Reads configuration from `app.env` and the environment, then serves
//! `POST /generate-pdf` and `GET /health` until Ctrl+C or SIGTERM.

use pdf_template_service::integrations::axum::{AppState, router, shutdown_signal};
use pdf_template_service::{DocumentService, from_env};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = from_env()?;
    let service = DocumentService::from_config(&config);
    let app = router(AppState::new(service, config.max_concurrent_renders));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("🚀 Server starting on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("✅ Server stopped");
    Ok(())
}
