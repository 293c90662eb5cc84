//! Headless Chrome print engine.
//!
//! [`ChromePrintEngine`] launches a dedicated Chrome process for every call,
//! loads the rendered HTML straight into a blank page, waits for the body to
//! be laid out and prints it to A4.
//!
//! # Protocol per call
//!
//! ```text
//! Launch ──▶ Load ──▶ Ready-wait ──▶ Print ──▶ Teardown
//!   │          │           │            │          ▲
//!   │          │           │            │          │
//!   └──────────┴───────────┴────────────┴── any failure
//! ```
//!
//! | Step | DevTools calls | Error |
//! |------|----------------|-------|
//! | Launch | process spawn | [`BrowserError::Launch`] |
//! | Load | `Page.navigate(about:blank)`, `Page.getFrameTree`, `Page.setDocumentContent` | [`BrowserError::Print`] |
//! | Ready-wait | `DOM.querySelector(body)`, `Runtime.evaluate` polling | [`BrowserError::RenderTimeout`] |
//! | Print | `Page.printToPDF` | [`BrowserError::Print`] |
//!
//! Nothing is shared between calls, so concurrent conversions cannot see
//! each other's DOM.

use std::time::{Duration, Instant};

use headless_chrome::protocol::cdp::Page;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{LaunchOptions, Tab};

use super::path::{BrowserPath, filesystem_probe, resolve_browser_path};
use super::session::BrowserSession;
use super::{PDF_SIGNATURE, PrintContext, PrintEngine};
use crate::error::BrowserError;

/// A4 paper width in inches.
pub const A4_WIDTH_INCHES: f64 = 8.27;

/// A4 paper height in inches.
pub const A4_HEIGHT_INCHES: f64 = 11.69;

/// Polling interval while waiting for the body to become visible.
const READY_POLL_INTERVAL_MS: u64 = 200;

/// Lower bound for the DevTools idle timeout.
const MIN_IDLE_TIMEOUT_SECS: u64 = 30;

/// Truthy once `<body>` exists, has a layout box and is not hidden.
const BODY_VISIBLE_JS: &str = r#"(() => {
    const body = document.body;
    if (!body) { return false; }
    const style = window.getComputedStyle(body);
    return style.visibility !== 'hidden'
        && style.display !== 'none'
        && body.getClientRects().length > 0;
})()"#;

/// Print engine backed by a per-call headless Chrome process.
///
/// The executable path is resolved once, at construction, and reused for
/// every call.
///
/// # Thread Safety
///
/// The engine holds only the immutable path, so it is `Send + Sync` and one
/// instance serves any number of concurrent calls.
///
/// # Example
///
/// ```rust,ignore
/// use pdf_template_service::engine::{BrowserPath, ChromePrintEngine};
///
/// // Resolve from CHROME_PATH / well-known locations
/// let engine = ChromePrintEngine::from_override(std::env::var("CHROME_PATH").ok().as_deref());
///
/// // Or pin a path
/// let engine = ChromePrintEngine::new(BrowserPath::new("/usr/bin/google-chrome"));
/// ```
#[derive(Debug, Clone)]
pub struct ChromePrintEngine {
    path: BrowserPath,
}

impl ChromePrintEngine {
    /// Create an engine that launches the executable at `path`.
    pub fn new(path: BrowserPath) -> Self {
        log::debug!("Creating ChromePrintEngine with browser: {}", path);
        Self { path }
    }

    /// Create an engine from an optional override, probing the filesystem
    /// when no override is given.
    pub fn from_override(override_path: Option<&str>) -> Self {
        Self::new(resolve_browser_path(override_path, filesystem_probe))
    }

    /// The executable this engine launches.
    pub fn browser_path(&self) -> &BrowserPath {
        &self.path
    }
}

impl PrintEngine for ChromePrintEngine {
    fn print_to_pdf(&self, html: &str, ctx: &PrintContext) -> Result<Vec<u8>, BrowserError> {
        let start_time = Instant::now();

        ctx.checkpoint("launch")?;
        let options = create_launch_options(&self.path, ctx.remaining())?;
        let mut session = BrowserSession::launch(options)?;

        ctx.checkpoint("load")?;
        let tab = session.open_tab(ctx.remaining())?;
        load_document(&tab, html)?;

        wait_for_body_visible(&tab, ctx)?;

        ctx.checkpoint("print")?;
        log::trace!("Printing page to PDF");
        let print_start = Instant::now();

        let pdf_data = tab.print_to_pdf(build_print_options()).map_err(|e| {
            log::error!("❌ Failed to print PDF: {}", e);
            BrowserError::Print(e.to_string())
        })?;

        if !pdf_data.starts_with(PDF_SIGNATURE) {
            log::error!(
                "❌ Browser returned {} bytes without a PDF signature",
                pdf_data.len()
            );
            return Err(BrowserError::Print(
                "browser output is not a PDF document".to_string(),
            ));
        }

        log::debug!(
            "PDF printed in {:?} ({} bytes)",
            print_start.elapsed(),
            pdf_data.len()
        );
        log::debug!("Total conversion time: {:?}", start_time.elapsed());

        Ok(pdf_data)
        // `session` drops here: tab closed, process killed.
    }
}

/// Create Chrome launch options for one isolated, headless conversion.
///
/// # Chrome Flags Applied
///
/// ## Environment
/// - sandbox disabled (required in containers)
/// - `--disable-gpu` - no GPU process
/// - `--disable-dev-shm-usage` - use /tmp instead of /dev/shm
///
/// ## GPU and Rendering
/// - `--disable-gpu-compositing`
/// - `--disable-software-rasterizer`
/// - `--disable-accelerated-2d-canvas`
/// - `--disable-webgl`
///
/// ## Disabled Features
/// - `--disable-extensions`
/// - `--disable-sync`
/// - `--disable-default-apps`
/// - `--disable-crash-reporter`
/// - `--no-first-run`
///
/// ## Stability
/// - `--disable-background-timer-throttling`
/// - `--disable-renderer-backgrounding`
/// - `--disable-hang-monitor`
///
/// `idle_timeout` keeps the DevTools connection open for the whole call; it
/// never drops below 30 seconds.
///
/// # Errors
///
/// Returns [`BrowserError::Launch`] if the options builder rejects the settings.
pub fn create_launch_options(
    path: &BrowserPath,
    idle_timeout: Duration,
) -> Result<LaunchOptions<'static>, BrowserError> {
    log::debug!("Creating Chrome options for: {}", path);

    let idle_timeout = idle_timeout.max(Duration::from_secs(MIN_IDLE_TIMEOUT_SECS));

    LaunchOptions::default_builder()
        .path(Some(path.as_path().to_path_buf()))
        .headless(true)
        .sandbox(false)
        .idle_browser_timeout(idle_timeout)
        .disable_default_args(true)
        .args(vec![
            // ===== Environment =====
            "--disable-gpu".as_ref(),
            "--disable-dev-shm-usage".as_ref(),
            // ===== GPU and Rendering =====
            "--disable-gpu-compositing".as_ref(),
            "--disable-software-rasterizer".as_ref(),
            "--disable-accelerated-2d-canvas".as_ref(),
            "--disable-webgl".as_ref(),
            // ===== Disable Unnecessary Features =====
            "--disable-extensions".as_ref(),
            "--disable-sync".as_ref(),
            "--disable-default-apps".as_ref(),
            "--disable-crash-reporter".as_ref(),
            "--no-first-run".as_ref(),
            // ===== Stability =====
            "--disable-background-timer-throttling".as_ref(),
            "--disable-renderer-backgrounding".as_ref(),
            "--disable-hang-monitor".as_ref(),
        ])
        .build()
        .map_err(|e| {
            log::error!("❌ Failed to build Chrome launch options (path: {}): {}", path, e);
            BrowserError::Launch(e.to_string())
        })
}

/// Build PDF print options: background graphics on, fixed A4 paper.
fn build_print_options() -> Option<PrintToPdfOptions> {
    Some(PrintToPdfOptions {
        print_background: Some(true),
        paper_width: Some(A4_WIDTH_INCHES),
        paper_height: Some(A4_HEIGHT_INCHES),
        display_header_footer: Some(false),
        ..Default::default()
    })
}

/// Navigate to a blank page and replace its document with `html`.
///
/// The HTML never touches the filesystem or the network.
fn load_document(tab: &Tab, html: &str) -> Result<(), BrowserError> {
    let load_start = Instant::now();

    tab.navigate_to("about:blank")
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(|e| {
            log::error!("❌ Failed to open blank page: {}", e);
            BrowserError::Print(format!("failed to open blank page: {}", e))
        })?;

    let frame_tree = tab.call_method(Page::GetFrameTree(None)).map_err(|e| {
        log::error!("❌ Failed to read frame tree: {}", e);
        BrowserError::Print(format!("failed to read frame tree: {}", e))
    })?;

    tab.call_method(Page::SetDocumentContent {
        frame_id: frame_tree.frame_tree.frame.id,
        html: html.to_string(),
    })
    .map_err(|e| {
        log::error!("❌ Failed to set document content: {}", e);
        BrowserError::Print(format!("failed to set document content: {}", e))
    })?;

    log::debug!(
        "Document loaded in {:?} ({} bytes of HTML)",
        load_start.elapsed(),
        html.len()
    );

    Ok(())
}

/// Block until `<body>` is present and visible, or the context runs out.
///
/// Printing before this point yields blank or truncated pages.
fn wait_for_body_visible(tab: &Tab, ctx: &PrintContext) -> Result<(), BrowserError> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(READY_POLL_INTERVAL_MS);

    ctx.checkpoint("ready-wait")?;
    tab.wait_for_element_with_custom_timeout("body", ctx.remaining())
        .map_err(|e| {
            log::error!("❌ Body element never appeared: {}", e);
            BrowserError::RenderTimeout(format!("body element not found: {}", e))
        })?;

    loop {
        if ctx.cancellation().is_cancelled() {
            return Err(BrowserError::Cancelled);
        }

        let visible = read_visibility(tab.evaluate(BODY_VISIBLE_JS, false).map(|r| r.value))?;

        if visible {
            log::debug!("Body visible after {:?}", start.elapsed());
            return Ok(());
        }

        let remaining = ctx.remaining();
        if remaining.is_zero() {
            log::warn!("⏱️ Body still not visible after {:?}", start.elapsed());
            return Err(BrowserError::RenderTimeout(format!(
                "body not visible after {:?}",
                start.elapsed()
            )));
        }

        std::thread::sleep(poll_interval.min(remaining));
    }
}

/// Interpret one visibility poll.
///
/// Only a `false` (or non-boolean) answer means "not ready yet". A failed
/// DevTools call is a print failure.
fn read_visibility<E: std::fmt::Display>(
    result: Result<Option<serde_json::Value>, E>,
) -> Result<bool, BrowserError> {
    match result {
        Ok(value) => Ok(value.and_then(|v| v.as_bool()).unwrap_or(false)),
        Err(e) => {
            log::error!("❌ Failed to check body visibility: {}", e);
            Err(BrowserError::Print(format!(
                "failed to check body visibility: {}",
                e
            )))
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
