//! The document pipeline: validate, render, print.
//!
//! ```text
//! DocumentRequest
//!       │
//!       ▼
//! ┌──────────────┐   EmptyTemplate / NilData
//! │   validate   │──────────────────────────────▶ Err(Validation)
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐   Syntax / Execution
//! │    render    │──────────────────────────────▶ Err(Template)
//! └──────┬───────┘
//!        ▼   spawn_blocking + timeout + cancellation
//! ┌──────────────┐   Launch / RenderTimeout / Print / Cancelled
//! │    print     │──────────────────────────────▶ Err(Browser)
//! └──────┬───────┘
//!        ▼
//!   %PDF… bytes
//! ```
//!
//! No retries and no fallback: the first failure is returned as-is.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::config::DocumentServiceConfig;
use crate::engine::{ChromePrintEngine, PDF_SIGNATURE, PrintContext, PrintEngine};
use crate::error::{BrowserError, Result, ValidationError};
use crate::service::types::DocumentRequest;
use crate::template::TemplateRenderer;

/// Turns [`DocumentRequest`]s into PDF bytes.
///
/// The service holds only immutable state (the renderer, the engine, the
/// timeout), so it can be wrapped in an `Arc` and called from any number of
/// tasks without locking. Each call gets its own browser from the engine.
///
/// # Example
///
/// ```rust,ignore
/// use pdf_template_service::{DocumentRequest, DocumentService, DocumentServiceConfig};
/// use serde_json::json;
///
/// let service = DocumentService::from_config(&DocumentServiceConfig::default());
/// let request = DocumentRequest::new(
///     "<html><body>{{Name}}</body></html>",
///     json!({ "Name": "John Doe" }).as_object().cloned(),
/// );
///
/// let pdf = service.generate_pdf(request).await?;
/// assert!(pdf.starts_with(b"%PDF"));
/// ```
pub struct DocumentService {
    renderer: TemplateRenderer,
    engine: Arc<dyn PrintEngine>,
    render_timeout: Duration,
}

impl DocumentService {
    /// Assemble a service from its parts.
    pub fn new(
        renderer: TemplateRenderer,
        engine: Arc<dyn PrintEngine>,
        render_timeout: Duration,
    ) -> Self {
        Self {
            renderer,
            engine,
            render_timeout,
        }
    }

    /// Build a Chrome-backed service from configuration.
    ///
    /// The browser path is resolved here, once, from `config.chrome_path`
    /// and the well-known install locations.
    pub fn from_config(config: &DocumentServiceConfig) -> Self {
        let engine = ChromePrintEngine::from_override(config.chrome_path.as_deref());
        log::info!("Using browser: {}", engine.browser_path());
        Self::with_engine(engine, config)
    }

    /// Build a service around a custom engine, taking the rest from `config`.
    pub fn with_engine<E>(engine: E, config: &DocumentServiceConfig) -> Self
    where
        E: PrintEngine + 'static,
    {
        Self::new(
            TemplateRenderer::new(config.strict_templates),
            Arc::new(engine),
            config.render_timeout,
        )
    }

    /// Bound on one conversion.
    pub fn render_timeout(&self) -> Duration {
        self.render_timeout
    }

    /// Validate the request and render its template, without printing.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::EmptyTemplate`] - empty `html_template` (checked first)
    /// - [`ValidationError::NilData`] - `data` is `None`
    /// - [`TemplateError`](crate::TemplateError) - parse or evaluation failure
    pub fn render_document(&self, request: &DocumentRequest) -> Result<String> {
        if request.html_template.is_empty() {
            log::warn!("Empty HTML template provided");
            return Err(ValidationError::EmptyTemplate.into());
        }

        let data = request.data.as_ref().ok_or_else(|| {
            log::warn!("No data provided");
            ValidationError::NilData
        })?;

        Ok(self.renderer.render(&request.html_template, data)?)
    }

    /// Generate a PDF from a template and its data.
    ///
    /// The browser work runs on a blocking thread. It is bounded by
    /// [`render_timeout`](Self::render_timeout); when that elapses, or when
    /// this future is dropped, the browser is told to stop and tears itself
    /// down.
    ///
    /// # Errors
    ///
    /// Validation, template and browser errors are returned unchanged; see
    /// [`DocumentError`](crate::DocumentError).
    pub async fn generate_pdf(&self, request: DocumentRequest) -> Result<Vec<u8>> {
        self.generate_pdf_with_guard(request, ()).await
    }

    /// [`generate_pdf`](Self::generate_pdf), holding `guard` for as long as
    /// the browser runs.
    ///
    /// The guard moves onto the blocking thread and is dropped only when the
    /// engine returns, which can be after this future has already reported a
    /// timeout or been dropped. Pass a semaphore permit here to bound live
    /// browsers rather than pending calls.
    pub async fn generate_pdf_with_guard<G>(
        &self,
        request: DocumentRequest,
        guard: G,
    ) -> Result<Vec<u8>>
    where
        G: Send + 'static,
    {
        let start_time = Instant::now();
        let html = self.render_document(&request)?;
        drop(request);

        log::debug!(
            "Rendered template to {} bytes of HTML, printing (timeout {:?})",
            html.len(),
            self.render_timeout
        );

        let token = CancellationToken::new();
        // Fires when this future completes or is dropped mid-flight.
        let _cancel_on_drop = token.clone().drop_guard();

        let ctx = PrintContext::new(Instant::now() + self.render_timeout, token.clone());
        let engine = Arc::clone(&self.engine);
        let task = tokio::task::spawn_blocking(move || {
            let result = engine.print_to_pdf(&html, &ctx);
            drop(guard);
            result
        });

        let pdf = match tokio::time::timeout(self.render_timeout, task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_error)) => {
                log::error!("❌ Print task failed: {}", join_error);
                return Err(BrowserError::Print(format!("print task failed: {}", join_error)).into());
            }
            Err(_) => {
                token.cancel();
                log::error!("❌ PDF generation timed out after {:?}", self.render_timeout);
                return Err(BrowserError::RenderTimeout(format!(
                    "PDF generation exceeded {:?}",
                    self.render_timeout
                ))
                .into());
            }
        };

        let pdf = check_signature(pdf)?;

        log::info!(
            "✅ PDF generated ({} bytes) in {:?}",
            pdf.len(),
            start_time.elapsed()
        );

        Ok(pdf)
    }

    /// Synchronous version of [`generate_pdf`](Self::generate_pdf).
    ///
    /// Blocks the calling thread; do not call it from an async context.
    /// The deadline is enforced by the engine's own checkpoints.
    pub fn generate_pdf_blocking(&self, request: &DocumentRequest) -> Result<Vec<u8>> {
        let start_time = Instant::now();
        let html = self.render_document(request)?;

        let ctx = PrintContext::with_timeout(self.render_timeout);
        let pdf = check_signature(self.engine.print_to_pdf(&html, &ctx)?)?;

        log::info!(
            "✅ PDF generated ({} bytes) in {:?}",
            pdf.len(),
            start_time.elapsed()
        );

        Ok(pdf)
    }
}

impl std::fmt::Debug for DocumentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentService")
            .field("renderer", &self.renderer)
            .field("render_timeout", &self.render_timeout)
            .finish_non_exhaustive()
    }
}

/// Output is all-or-nothing: anything that is not a PDF is a print failure.
fn check_signature(pdf: Vec<u8>) -> std::result::Result<Vec<u8>, BrowserError> {
    if pdf.starts_with(PDF_SIGNATURE) {
        Ok(pdf)
    } else {
        log::error!("❌ Engine returned {} bytes without a PDF signature", pdf.len());
        Err(BrowserError::Print(
            "browser output is not a PDF document".to_string(),
        ))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
