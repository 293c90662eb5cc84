//! Browser print engines.
//!
//! This module provides the [`PrintEngine`] trait, the seam between the
//! document service and whatever turns HTML into PDF bytes.
//!
//! # Available Engines
//!
//! | Engine | Description |
//! |--------|-------------|
//! | [`ChromePrintEngine`] | One headless Chrome process per call |
//! | [`mock::MockPrintEngine`] | For testing (feature-gated) |
//!
//! # Example
//!
//! ```rust,ignore
//! use pdf_template_service::engine::{ChromePrintEngine, PrintContext, PrintEngine};
//! use std::time::Duration;
//!
//! let engine = ChromePrintEngine::from_override(None);
//! let ctx = PrintContext::with_timeout(Duration::from_secs(30));
//! let pdf = engine.print_to_pdf("<html><body>Hello</body></html>", &ctx)?;
//! assert!(pdf.starts_with(b"%PDF"));
//! ```

mod chrome;
mod path;
mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use chrome::{A4_HEIGHT_INCHES, A4_WIDTH_INCHES, ChromePrintEngine, create_launch_options};
pub use path::{
    BrowserPath, LINUX_CHROMIUM_PATH, MACOS_CHROME_PATH, filesystem_probe, resolve_browser_path,
};

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::BrowserError;

/// The 4-byte signature every PDF file starts with.
pub const PDF_SIGNATURE: &[u8] = b"%PDF";

/// Per-call limits handed to a [`PrintEngine`].
///
/// Engines check [`checkpoint`](Self::checkpoint) between steps so a call
/// that ran out of time, or whose caller went away, stops early and tears
/// its browser down.
#[derive(Debug, Clone)]
pub struct PrintContext {
    deadline: Instant,
    cancel: CancellationToken,
}

impl PrintContext {
    /// Create a context with an explicit deadline and token.
    pub fn new(deadline: Instant, cancel: CancellationToken) -> Self {
        Self { deadline, cancel }
    }

    /// Create a context expiring `timeout` from now with a fresh token.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(Instant::now() + timeout, CancellationToken::new())
    }

    /// The instant after which the call counts as timed out.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline (zero once it has passed).
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// The cancellation token for this call.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Fail if the call was cancelled or its deadline has passed.
    ///
    /// `stage` names the step about to run and ends up in the timeout message.
    pub fn checkpoint(&self, stage: &str) -> Result<(), BrowserError> {
        if self.cancel.is_cancelled() {
            log::debug!("Cancelled before {}", stage);
            return Err(BrowserError::Cancelled);
        }
        if Instant::now() >= self.deadline {
            log::warn!("⏱️ Deadline passed before {}", stage);
            return Err(BrowserError::RenderTimeout(format!(
                "deadline exceeded before {}",
                stage
            )));
        }
        Ok(())
    }
}

/// Converts rendered HTML into PDF bytes.
///
/// Implementations are blocking and are driven from a blocking thread by
/// [`DocumentService`](crate::DocumentService). They must be safe to call
/// from many threads at once without shared mutable state.
///
/// # Implementors
///
/// - [`ChromePrintEngine`] - Headless Chrome via the DevTools protocol
/// - [`mock::MockPrintEngine`] - For testing (when `test-utils` feature enabled)
pub trait PrintEngine: Send + Sync {
    /// Load `html` as the document content and print it to PDF.
    ///
    /// # Errors
    ///
    /// - [`BrowserError::Launch`] - the browser could not be started
    /// - [`BrowserError::RenderTimeout`] - the page was not ready before the deadline
    /// - [`BrowserError::Print`] - loading or printing failed
    /// - [`BrowserError::Cancelled`] - the context was cancelled
    fn print_to_pdf(&self, html: &str, ctx: &PrintContext) -> Result<Vec<u8>, BrowserError>;
}

impl<T: PrintEngine + ?Sized> PrintEngine for std::sync::Arc<T> {
    fn print_to_pdf(&self, html: &str, ctx: &PrintContext) -> Result<Vec<u8>, BrowserError> {
        (**self).print_to_pdf(html, ctx)
    }
}

impl<T: PrintEngine + ?Sized> PrintEngine for Box<T> {
    fn print_to_pdf(&self, html: &str, ctx: &PrintContext) -> Result<Vec<u8>, BrowserError> {
        (**self).print_to_pdf(html, ctx)
    }
}
