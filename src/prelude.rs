//! Convenient imports for common usage patterns.
//!
//! ```rust,ignore
//! use pdf_template_service::prelude::*;
//! ```
//!
//! This imports:
//!
//! - [`DocumentService`] - The pipeline
//! - [`DocumentRequest`] - Template plus data
//! - [`DocumentServiceConfig`] / [`DocumentServiceConfigBuilder`] - Configuration
//! - [`DocumentError`] and [`Result`] - Error handling
//! - [`TemplateRenderer`] - Template substitution on its own
//! - [`PrintEngine`] / [`ChromePrintEngine`] - Browser backends
//! - [`SharedDocumentService`] - Type alias for a shared service

// Core types
pub use crate::SharedDocumentService;
pub use crate::config::{DocumentServiceConfig, DocumentServiceConfigBuilder};
pub use crate::engine::{ChromePrintEngine, PrintContext, PrintEngine};
pub use crate::error::{DocumentError, Result};
pub use crate::service::{DocumentRequest, DocumentService};
pub use crate::template::TemplateRenderer;

// Feature-gated exports
#[cfg(feature = "env-config")]
pub use crate::config::env::from_env;

// Commonly needed with SharedDocumentService
pub use std::sync::Arc;
