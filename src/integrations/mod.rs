//! Web framework integrations.
//!
//! | Framework | Feature Flag | Module |
//! |-----------|--------------|--------|
//! | Axum | `axum-integration` (default) | `axum` |
//!
//! The integration is a thin layer: it parses the upload, hands a
//! [`DocumentRequest`](crate::DocumentRequest) to the
//! [`DocumentService`](crate::DocumentService) and maps the result to a
//! response.

#[cfg(feature = "axum-integration")]
pub mod axum;
