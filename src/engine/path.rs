//! Browser executable resolution.
//!
//! Resolution is a pure function of an optional override and a probe
//! callback, so it can be tested without touching the filesystem or the
//! process environment.
//!
//! # Priority
//!
//! | Step | Source | Existence checked? |
//! |------|--------|--------------------|
//! | 1 | Explicit override (`CHROME_PATH`) | No |
//! | 2 | [`MACOS_CHROME_PATH`] | Yes, via the probe |
//! | 3 | [`LINUX_CHROMIUM_PATH`] | No (last resort) |
//!
//! # Example
//!
//! ```rust
//! use pdf_template_service::engine::{resolve_browser_path, LINUX_CHROMIUM_PATH};
//!
//! let path = resolve_browser_path(None, |_| false);
//! assert_eq!(path.as_path().to_str(), Some(LINUX_CHROMIUM_PATH));
//!
//! let path = resolve_browser_path(Some("/custom/path"), |_| false);
//! assert_eq!(path.as_path().to_str(), Some("/custom/path"));
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

/// Default Google Chrome location on macOS.
pub const MACOS_CHROME_PATH: &str = "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome";

/// Default headless Chromium location in Linux containers.
pub const LINUX_CHROMIUM_PATH: &str = "/usr/bin/chromium-browser";

/// A resolved browser executable path.
///
/// Resolution never fails, so holding a `BrowserPath` says nothing about
/// whether the file exists. A bad path surfaces later as
/// [`BrowserError::Launch`](crate::BrowserError::Launch).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BrowserPath(PathBuf);

impl BrowserPath {
    /// Wrap an arbitrary path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Borrow the underlying path.
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for BrowserPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for BrowserPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Decide which browser executable to launch.
///
/// An override that is `Some` and non-empty is returned verbatim. Otherwise
/// `probe` is asked about the macOS install location, and the Linux
/// container default is used if that is absent.
pub fn resolve_browser_path<P>(override_path: Option<&str>, probe: P) -> BrowserPath
where
    P: Fn(&Path) -> bool,
{
    if let Some(path) = override_path.filter(|p| !p.is_empty()) {
        log::debug!("Using browser override: {}", path);
        return BrowserPath::new(path);
    }

    let macos = Path::new(MACOS_CHROME_PATH);
    if probe(macos) {
        log::debug!("Found browser at macOS default: {}", MACOS_CHROME_PATH);
        return BrowserPath::new(macos);
    }

    log::debug!("Falling back to Linux default: {}", LINUX_CHROMIUM_PATH);
    BrowserPath::new(LINUX_CHROMIUM_PATH)
}

/// Production probe: does anything exist at `path`?
pub fn filesystem_probe(path: &Path) -> bool {
    path.exists()
}
