//! Scoped browser lifetime for a single conversion.
//!
//! [`BrowserSession`] owns the headless Chrome process and its tab for
//! exactly one call. Dropping it closes the tab and kills the process,
//! which also removes the temporary profile directory, so teardown runs on
//! every exit path:
//! - normal return
//! - early return through `?`
//! - a panic unwinding through the engine
//!
//! ```text
//! BrowserSession::launch ──▶ open_tab ──▶ load / wait / print
//!        │                                       │
//!        └──────────────── Drop ◀────────────────┘
//!                   close tab (best effort)
//!                   drop Browser (kills process)
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use headless_chrome::{Browser, LaunchOptions, Tab};

use crate::error::BrowserError;

/// A browser process plus at most one tab, torn down on drop.
pub(crate) struct BrowserSession {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
    started: Instant,
}

impl BrowserSession {
    /// Start a fresh browser process.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Launch`] if Chrome cannot be started.
    pub(crate) fn launch(options: LaunchOptions<'static>) -> Result<Self, BrowserError> {
        let started = Instant::now();
        log::debug!("🚀 Launching Chrome browser...");

        let browser = Browser::new(options).map_err(|e| {
            log::error!("❌ Chrome launch failed: {}", e);
            BrowserError::Launch(e.to_string())
        })?;

        log::debug!("Browser launched in {:?}", started.elapsed());

        Ok(Self {
            browser: Some(browser),
            tab: None,
            started,
        })
    }

    /// Open the tab this session prints from.
    ///
    /// Every DevTools call on the returned tab waits at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Print`] if the tab cannot be created.
    pub(crate) fn open_tab(&mut self, timeout: Duration) -> Result<Arc<Tab>, BrowserError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| BrowserError::Print("browser session already closed".to_string()))?;

        log::trace!("Creating new browser tab");
        let tab = browser.new_tab().map_err(|e| {
            log::error!("❌ Failed to create tab: {}", e);
            BrowserError::Print(format!("failed to create tab: {}", e))
        })?;

        tab.set_default_timeout(timeout);
        self.tab = Some(Arc::clone(&tab));

        Ok(tab)
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Some(tab) = self.tab.take() {
            log::trace!("Closing browser tab");
            if let Err(e) = tab.close(true) {
                // The process is killed right after, which releases the tab anyway.
                log::warn!("Failed to close tab (continuing with teardown): {}", e);
            }
        }

        if let Some(browser) = self.browser.take() {
            drop(browser);
            log::debug!(
                "🧹 Browser session torn down after {:?}",
                self.started.elapsed()
            );
        }
    }
}
