//! # pdf-template-service
//!
//! Templated HTML to PDF conversion backed by headless Chrome.
//!
//! A caller supplies an HTML template and a data map. The crate substitutes
//! the data into the template, loads the result into a freshly launched
//! headless browser and prints it to an A4 PDF.
//!
//! ## Features
//!
//! - **Safe templating**: Handlebars syntax with HTML escaping on by default
//! - **One browser per call**: no state leaks between documents
//! - **Bounded conversions**: every call has a deadline and is cancelled
//!   when its caller goes away
//! - **Typed errors**: client mistakes and browser failures are distinct
//!   and map to HTTP 400 / 500
//! - **HTTP endpoint**: optional Axum integration with multipart upload
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │   HTTP boundary (integrations::axum)        │
//! │   multipart → DocumentRequest, semaphore    │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │              DocumentService                │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │  validate  (EmptyTemplate, NilData)     │ │
//! │ └─────────────────────────────────────────┘ │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │  TemplateRenderer (handlebars)          │ │
//! │ └─────────────────────────────────────────┘ │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │  PrintEngine (spawn_blocking, timeout)  │ │
//! │ └─────────────────────────────────────────┘ │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │     ChromePrintEngine → headless Chrome     │
//! │   (path resolved once: CHROME_PATH, macOS   │
//! │    install, /usr/bin/chromium-browser)      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pdf_template_service::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let config = DocumentServiceConfigBuilder::new()
//!         .render_timeout(std::time::Duration::from_secs(30))
//!         .build()?;
//!
//!     let service = DocumentService::from_config(&config);
//!
//!     let request = DocumentRequest::new(
//!         "<html><body><h1>{{Name}}</h1></body></html>",
//!         json!({ "Name": "John Doe" }).as_object().cloned(),
//!     );
//!
//!     let pdf = service.generate_pdf(request).await?;
//!     std::fs::write("dynamic_document.pdf", pdf)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Configuration
//!
//! With the `env-config` feature, configuration can be read from an
//! `app.env` file and the process environment:
//!
//! ```rust,no_run
//! use pdf_template_service::from_env;
//!
//! let config = from_env().expect("invalid configuration");
//! println!("listening on {}", config.bind_addr);
//! ```
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `CHROME_PATH` | String | auto | Browser executable |
//! | `PDF_RENDER_TIMEOUT_SECONDS` | u64 | 60 | Bound on one conversion |
//! | `PDF_MAX_CONCURRENT_RENDERS` | usize | 4 | Simultaneous conversions over HTTP |
//! | `PDF_TEMPLATE_STRICT` | bool | false | Missing template fields are errors |
//! | `PDF_SERVICE_ADDR` | String | `0.0.0.0:8080` | Server bind address |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `env-config` | Environment-based configuration (default) |
//! | `axum-integration` | Axum HTTP endpoint (default) |
//! | `test-utils` | Enable [`MockPrintEngine`](engine::mock::MockPrintEngine) |
//!
//! ## Error Handling
//!
//! All pipeline operations return [`Result<T, DocumentError>`](Result):
//!
//! ```rust,ignore
//! use pdf_template_service::{BrowserError, DocumentError, ValidationError};
//!
//! match service.generate_pdf(request).await {
//!     Ok(pdf) => save(pdf),
//!     Err(DocumentError::Validation(ValidationError::NilData)) => {
//!         // Caller forgot the data
//!     }
//!     Err(DocumentError::Browser(BrowserError::Launch(msg))) => {
//!         eprintln!("Chrome is not installed? {}", msg);
//!     }
//!     Err(e) => eprintln!("Failed to generate PDF: {}", e),
//! }
//! ```
//!
//! ## Testing
//!
//! For testing without Chrome, enable the `test-utils` feature and use
//! [`MockPrintEngine`](engine::mock::MockPrintEngine):
//!
//! ```rust,ignore
//! use pdf_template_service::engine::mock::MockPrintEngine;
//!
//! let service = DocumentService::with_engine(MockPrintEngine::new(), &config);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod prelude;
pub mod service;
pub mod template;

// ============================================================================
// Feature-gated modules
// ============================================================================

/// Web framework integrations.
///
/// Enable `axum-integration` (on by default) to use them.
#[cfg(feature = "axum-integration")]
pub mod integrations;

// ============================================================================
// Re-exports (Public API)
// ============================================================================

// Core types
pub use config::{DocumentServiceConfig, DocumentServiceConfigBuilder};
pub use engine::{BrowserPath, ChromePrintEngine, PrintContext, PrintEngine, resolve_browser_path};
pub use error::{BrowserError, ConfigError, DocumentError, Result, TemplateError, ValidationError};
pub use service::{DocumentRequest, DocumentService, HealthResponse};
pub use template::TemplateRenderer;

// Feature-gated re-exports
#[cfg(feature = "env-config")]
pub use config::env::from_env;

// ============================================================================
// Convenience type aliases
// ============================================================================

/// Shared document service type for web frameworks.
///
/// The service is immutable, so an `Arc` is all that is needed to share it
/// across handlers.
pub type SharedDocumentService = std::sync::Arc<DocumentService>;
