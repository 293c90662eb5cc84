//! Mock print engine for testing.
//!
//! [`MockPrintEngine`] stands in for a real browser so the document service
//! and the HTTP boundary can be tested without Chrome installed.
//!
//! # Feature Flag
//!
//! This module is only available when:
//! - The `test-utils` feature is enabled, OR
//! - During testing (`#[cfg(test)]`)
//!
//! # Example
//!
//! ```rust,ignore
//! use pdf_template_service::engine::mock::MockPrintEngine;
//!
//! // Engine that "prints" by wrapping the HTML in a PDF envelope
//! let engine = MockPrintEngine::new();
//!
//! // Engine that fails like a missing executable
//! let engine = MockPrintEngine::always_fails(BrowserError::Launch("not installed".into()));
//!
//! // Engine that never finishes until cancelled or out of time
//! let engine = MockPrintEngine::hangs();
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{PrintContext, PrintEngine};
use crate::error::BrowserError;

/// How a [`MockPrintEngine`] answers.
#[derive(Debug, Clone)]
enum Behavior {
    /// Return a fake PDF that embeds the HTML.
    Succeed,
    /// Return this error.
    Fail(BrowserError),
    /// Block until the context is cancelled or times out.
    Hang,
}

/// Mock print engine for testing without Chrome.
///
/// Successful calls return `%PDF-1.4` followed by the HTML verbatim and an
/// `%%EOF` trailer, so tests can check exactly which document was printed.
///
/// # Thread Safety
///
/// Counters are atomic and the recorded HTML sits behind a mutex; the engine
/// can be shared across tasks.
pub struct MockPrintEngine {
    behavior: Behavior,
    delay: Duration,
    call_count: Arc<AtomicUsize>,
    printed: Arc<Mutex<Vec<String>>>,
}

impl MockPrintEngine {
    /// Create an engine that always succeeds.
    pub fn new() -> Self {
        Self::with_behavior(Behavior::Succeed)
    }

    /// Create an engine that always returns `error`.
    pub fn always_fails(error: BrowserError) -> Self {
        Self::with_behavior(Behavior::Fail(error))
    }

    /// Create an engine whose calls only end by cancellation or deadline.
    pub fn hangs() -> Self {
        Self::with_behavior(Behavior::Hang)
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            delay: Duration::ZERO,
            call_count: Arc::new(AtomicUsize::new(0)),
            printed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sleep for `delay` before answering (successful engines only).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of `print_to_pdf` calls so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// A clone of the call counter, usable after the engine is moved.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }

    /// Every HTML document passed to the engine, in call order.
    pub fn printed_documents(&self) -> Vec<String> {
        self.printed
            .lock()
            .map(|docs| docs.clone())
            .unwrap_or_default()
    }

    /// The fake PDF bytes a successful call returns for `html`.
    pub fn fake_pdf(html: &str) -> Vec<u8> {
        let mut pdf = b"%PDF-1.4\n".to_vec();
        pdf.extend_from_slice(html.as_bytes());
        pdf.extend_from_slice(b"\n%%EOF\n");
        pdf
    }
}

impl Default for MockPrintEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PrintEngine for MockPrintEngine {
    fn print_to_pdf(&self, html: &str, ctx: &PrintContext) -> Result<Vec<u8>, BrowserError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut docs) = self.printed.lock() {
            docs.push(html.to_string());
        }

        match &self.behavior {
            Behavior::Fail(error) => {
                log::debug!("MockPrintEngine: Returning configured failure");
                Err(error.clone())
            }
            Behavior::Hang => loop {
                ctx.checkpoint("mock print")?;
                std::thread::sleep(Duration::from_millis(10));
            },
            Behavior::Succeed => {
                if !self.delay.is_zero() {
                    std::thread::sleep(self.delay);
                }
                ctx.checkpoint("mock print")?;
                Ok(Self::fake_pdf(html))
            }
        }
    }
}

impl std::fmt::Debug for MockPrintEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPrintEngine")
            .field("behavior", &self.behavior)
            .field("delay", &self.delay)
            .field("call_count", &self.call_count.load(Ordering::SeqCst))
            .finish()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;

    fn ctx() -> PrintContext {
        PrintContext::with_timeout(Duration::from_secs(5))
    }

    #[test]
    fn test_mock_engine_succeeds_with_signature() {
        let engine = MockPrintEngine::new();
        let pdf = engine.print_to_pdf("<p>hi</p>", &ctx()).unwrap();

        assert!(pdf.starts_with(b"%PDF"));
        assert_eq!(pdf, MockPrintEngine::fake_pdf("<p>hi</p>"));
        assert_eq!(engine.printed_documents(), vec!["<p>hi</p>".to_string()]);
    }

    #[test]
    fn test_mock_engine_always_fails() {
        let engine = MockPrintEngine::always_fails(BrowserError::Launch("Test error".into()));

        match engine.print_to_pdf("<p>x</p>", &ctx()) {
            Err(BrowserError::Launch(msg)) => assert_eq!(msg, "Test error"),
            other => panic!("Expected Launch error, got {:?}", other),
        }
    }

    #[test]
    fn test_mock_engine_counts_calls() {
        let engine = MockPrintEngine::new();
        let counter = engine.counter();

        assert_eq!(engine.call_count(), 0);
        let _ = engine.print_to_pdf("a", &ctx());
        let _ = engine.print_to_pdf("b", &ctx());
        assert_eq!(engine.call_count(), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_mock_engine_hang_stops_on_deadline() {
        let engine = MockPrintEngine::hangs();
        let ctx = PrintContext::with_timeout(Duration::from_millis(50));

        let result = engine.print_to_pdf("x", &ctx);
        assert!(matches!(result, Err(BrowserError::RenderTimeout(_))));
    }

    #[test]
    fn test_mock_engine_hang_stops_on_cancel() {
        let engine = MockPrintEngine::hangs();
        let token = CancellationToken::new();
        let ctx = PrintContext::new(
            std::time::Instant::now() + Duration::from_secs(60),
            token.clone(),
        );

        let handle = std::thread::spawn(move || engine.print_to_pdf("x", &ctx));
        std::thread::sleep(Duration::from_millis(30));
        token.cancel();

        let result = handle.join().unwrap();
        assert_eq!(result, Err(BrowserError::Cancelled));
    }

    #[test]
    fn test_mock_engine_debug() {
        let engine = MockPrintEngine::always_fails(BrowserError::Cancelled);
        let debug_str = format!("{:?}", engine);

        assert!(debug_str.contains("MockPrintEngine"));
        assert!(debug_str.contains("Fail"));
    }
}
