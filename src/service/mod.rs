//! Document generation service.
//!
//! This module is the **framework-agnostic core**: everything between "a
//! template and some data arrived" and "here are the PDF bytes". The HTTP
//! layer in [`crate::integrations`] only maps requests and responses.
//!
//! # Module Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                    service module (this module)               │
//! │                                                               │
//! │  ┌──────────────────────┐   ┌──────────────────────────────┐  │
//! │  │      types.rs        │   │         document.rs          │  │
//! │  │  DocumentRequest     │   │  DocumentService             │  │
//! │  │  HealthResponse      │   │    render_document()         │  │
//! │  │  DEFAULT_DOCUMENT_   │   │    generate_pdf()            │  │
//! │  │    NAME              │   │    generate_pdf_blocking()   │  │
//! │  └──────────────────────┘   └──────────────┬───────────────┘  │
//! │                                            │ uses             │
//! │                      ┌─────────────────────┴──────────┐       │
//! │                      ▼                                ▼       │
//! │              TemplateRenderer                  PrintEngine    │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design
//!
//! | Layer | Responsibility | This Module? |
//! |-------|----------------|--------------|
//! | **Service** | Validation, rendering, printing, timeouts | ✅ Yes |
//! | **Handler** | Multipart parsing, status codes, headers | ❌ No (integrations) |
//!
//! # Blocking Behavior
//!
//! [`DocumentService::generate_pdf`] is async and moves browser work to the
//! blocking pool itself. [`DocumentService::generate_pdf_blocking`] runs on
//! the caller's thread and must not be called from an async context.
//!
//! # Error Handling
//!
//! Every operation returns [`crate::Result`]. The error carries its HTTP
//! mapping:
//!
//! ```rust,ignore
//! match service.generate_pdf(request).await {
//!     Ok(pdf) => respond_pdf(pdf),
//!     Err(e) if e.is_client_error() => respond(400, e.to_string()),
//!     Err(e) => respond(500, format!("Failed to generate PDF: {}", e)),
//! }
//! ```

mod document;
mod types;

pub use document::DocumentService;
pub use types::{DEFAULT_DOCUMENT_NAME, DocumentRequest, HealthResponse};
