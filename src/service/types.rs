//! Request and response types for the document service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default filename used in `Content-Disposition` for generated documents.
pub const DEFAULT_DOCUMENT_NAME: &str = "dynamic_document";

/// A template plus the data to fill it with.
///
/// Created per call and dropped when the call finishes.
///
/// # Validation
///
/// - `html_template` must be non-empty
/// - `data` must be `Some` (an empty map is valid)
///
/// # JSON Format
///
/// ```json
/// {
///     "html_template": "<html><body>{{Name}}</body></html>",
///     "data": { "Name": "John Doe" }
/// }
/// ```
///
/// A JSON `null` or missing `data` field deserializes to `None` and is
/// rejected by the service, not by the parser.
///
/// # Example
///
/// ```rust
/// use pdf_template_service::DocumentRequest;
/// use serde_json::json;
///
/// let request = DocumentRequest::new(
///     "<html><body>{{Name}}</body></html>",
///     json!({ "Name": "John Doe" }).as_object().cloned(),
/// );
/// assert!(request.data.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRequest {
    /// HTML template text.
    pub html_template: String,

    /// Values substituted into the template.
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

impl DocumentRequest {
    /// Create a request.
    pub fn new(html_template: impl Into<String>, data: Option<Map<String, Value>>) -> Self {
        Self {
            html_template: html_template.into(),
            data,
        }
    }

    /// Create a request with a data map that is known to be present.
    pub fn with_data(html_template: impl Into<String>, data: Map<String, Value>) -> Self {
        Self::new(html_template, Some(data))
    }
}

/// Health check response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` when the service answers.
    pub status: String,
    /// Service name.
    pub service: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}
