//! Error types for the document pipeline.
//!
//! Every stage of the pipeline has its own error enum, and
//! [`DocumentError`] wraps them so the boundary layer can tell a bad request
//! from a broken environment:
//!
//! | Stage | Type | Fault | HTTP |
//! |-------|------|-------|------|
//! | Input validation | [`ValidationError`] | client | 400 |
//! | Template substitution | [`TemplateError`] | client | 400 |
//! | Browser launch / load / print | [`BrowserError`] | server | 500 |
//!
//! # Example
//!
//! ```rust
//! use pdf_template_service::{DocumentError, ValidationError};
//!
//! let error: DocumentError = ValidationError::EmptyTemplate.into();
//! assert_eq!(error.status_code(), 400);
//! assert_eq!(error.to_string(), "HTML template cannot be empty");
//! ```

/// A request failed validation before any work was done.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The `html_template` field was empty.
    #[error("HTML template cannot be empty")]
    EmptyTemplate,

    /// The `data` mapping was absent (an empty mapping is fine).
    #[error("Data cannot be nil")]
    NilData,
}

/// Template substitution failed.
///
/// Both variants are caused by the caller's template or data, so they are
/// reported as client errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// The template text could not be parsed (unbalanced or malformed markers).
    #[error("Template syntax error: {0}")]
    Syntax(String),

    /// The template parsed but evaluating it against the data failed.
    #[error("Template execution error: {0}")]
    Execution(String),
}

/// The headless browser could not produce a PDF.
///
/// These errors come from the environment (missing executable, hung
/// renderer, resource exhaustion) rather than from the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrowserError {
    /// The browser executable is missing or could not be started.
    ///
    /// # Common Causes
    ///
    /// - Chrome/Chromium is not installed at the resolved path
    /// - `CHROME_PATH` points at something that is not executable
    /// - Process limits exceeded
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    /// The page did not become ready (or the whole conversion did not finish)
    /// within the configured bound.
    #[error("Render timeout: {0}")]
    RenderTimeout(String),

    /// A DevTools call after launch failed: loading the document or printing it.
    #[error("Print to PDF failed: {0}")]
    Print(String),

    /// The caller went away before the conversion finished.
    #[error("PDF generation was cancelled")]
    Cancelled,
}

impl BrowserError {
    /// Returns `true` if retrying later might succeed.
    ///
    /// Launch, timeout and print failures are environmental and may clear
    /// up; a cancelled call has nobody left to retry it.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// Errors returned by [`DocumentService`](crate::DocumentService).
///
/// The wrapped error is returned unchanged from the stage that produced it;
/// this enum only adds the stage tag.
///
/// # Example
///
/// ```rust
/// use pdf_template_service::{BrowserError, DocumentError, TemplateError};
///
/// fn describe(error: &DocumentError) -> &'static str {
///     match error {
///         DocumentError::Validation(_) => "fix the request",
///         DocumentError::Template(TemplateError::Syntax(_)) => "fix the template markup",
///         DocumentError::Template(TemplateError::Execution(_)) => "fix the template data",
///         DocumentError::Browser(BrowserError::RenderTimeout(_)) => "page never became ready",
///         DocumentError::Browser(_) => "browser problem, retry later",
///     }
/// }
///
/// let error = DocumentError::from(BrowserError::Launch("no such file".into()));
/// assert_eq!(describe(&error), "browser problem, retry later");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Template parsing or evaluation failed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The browser failed to launch, load, or print.
    #[error(transparent)]
    Browser(#[from] BrowserError),
}

impl DocumentError {
    /// Returns `true` for errors caused by the request itself.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Template(_))
    }

    /// Returns the HTTP status code for this error.
    ///
    /// ```rust
    /// use pdf_template_service::{BrowserError, DocumentError, TemplateError};
    ///
    /// let error = DocumentError::from(TemplateError::Syntax("unclosed".into()));
    /// assert_eq!(error.status_code(), 400);
    ///
    /// let error = DocumentError::from(BrowserError::Print("target closed".into()));
    /// assert_eq!(error.status_code(), 500);
    /// ```
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }

    /// Returns a stable machine-readable error code.
    ///
    /// | Code | Error |
    /// |------|-------|
    /// | `EMPTY_TEMPLATE` | Empty template |
    /// | `NIL_DATA` | Missing data mapping |
    /// | `TEMPLATE_SYNTAX` | Template could not be parsed |
    /// | `TEMPLATE_EXECUTION` | Template evaluation failed |
    /// | `BROWSER_LAUNCH_FAILED` | Browser did not start |
    /// | `RENDER_TIMEOUT` | Page not ready in time |
    /// | `PRINT_FAILED` | Load or print call failed |
    /// | `CANCELLED` | Caller went away |
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::EmptyTemplate) => "EMPTY_TEMPLATE",
            Self::Validation(ValidationError::NilData) => "NIL_DATA",
            Self::Template(TemplateError::Syntax(_)) => "TEMPLATE_SYNTAX",
            Self::Template(TemplateError::Execution(_)) => "TEMPLATE_EXECUTION",
            Self::Browser(BrowserError::Launch(_)) => "BROWSER_LAUNCH_FAILED",
            Self::Browser(BrowserError::RenderTimeout(_)) => "RENDER_TIMEOUT",
            Self::Browser(BrowserError::Print(_)) => "PRINT_FAILED",
            Self::Browser(BrowserError::Cancelled) => "CANCELLED",
        }
    }

    /// Returns `true` if the caller may retry (with backoff) at its own discretion.
    ///
    /// Client errors are never retryable: the same request fails the same way.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_) | Self::Template(_) => false,
            Self::Browser(e) => e.is_retryable(),
        }
    }
}

/// Invalid service configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Configuration error: {0}")]
pub struct ConfigError(pub String);

impl From<String> for ConfigError {
    fn from(msg: String) -> Self {
        ConfigError(msg)
    }
}

impl From<&str> for ConfigError {
    fn from(msg: &str) -> Self {
        ConfigError(msg.to_string())
    }
}

/// Result type alias using [`DocumentError`].
pub type Result<T> = std::result::Result<T, DocumentError>;

// ============================================================================
// Unit Tests
// ============================================================================
