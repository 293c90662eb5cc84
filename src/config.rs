//! Configuration for the document service and its HTTP boundary.
//!
//! This module provides [`DocumentServiceConfig`] and
//! [`DocumentServiceConfigBuilder`].
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use pdf_template_service::DocumentServiceConfigBuilder;
//!
//! let config = DocumentServiceConfigBuilder::new()
//!     .chrome_path("/opt/chrome/chrome")
//!     .render_timeout(Duration::from_secs(30))
//!     .max_concurrent_renders(8)
//!     .build()
//!     .expect("Invalid configuration");
//!
//! assert_eq!(config.max_concurrent_renders, 8);
//! ```
//!
//! # Environment Configuration
//!
//! When the `env-config` feature is enabled, configuration can be read from
//! environment variables and an optional `app.env` file. See [`mod@env`].

use std::time::Duration;

use crate::error::ConfigError;

/// Default bound on a single PDF conversion, in seconds.
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 60;

/// Default number of conversions allowed in flight at the HTTP boundary.
pub const DEFAULT_MAX_CONCURRENT_RENDERS: usize = 4;

/// Default server bind address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Configuration for [`DocumentService`](crate::DocumentService).
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `chrome_path` | `None` | Explicit browser executable |
/// | `render_timeout` | 60s | Bound on one conversion |
/// | `max_concurrent_renders` | 4 | Boundary concurrency limit |
/// | `strict_templates` | `false` | Missing fields fail rendering |
/// | `bind_addr` | `0.0.0.0:8080` | Server listen address |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentServiceConfig {
    /// Explicit browser executable, used verbatim when set.
    ///
    /// When `None` the path resolver probes the well-known install locations.
    pub chrome_path: Option<String>,

    /// Upper bound on launch + load + ready-wait + print for one request.
    ///
    /// A hung browser fails the call with
    /// [`BrowserError::RenderTimeout`](crate::BrowserError::RenderTimeout)
    /// once this elapses.
    pub render_timeout: Duration,

    /// Maximum conversions in flight at once.
    ///
    /// Each conversion is a real browser process, so this bounds process
    /// and memory usage under load. Enforced by the HTTP boundary, not the
    /// pipeline.
    pub max_concurrent_renders: usize,

    /// Whether referencing a missing field is a template execution error.
    ///
    /// Off by default: missing fields render empty. Walking into a scalar
    /// (`{{Name.first}}` with a string `Name`) is an error either way.
    pub strict_templates: bool,

    /// Address the HTTP server listens on.
    pub bind_addr: String,
}

impl Default for DocumentServiceConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            render_timeout: Duration::from_secs(DEFAULT_RENDER_TIMEOUT_SECS),
            max_concurrent_renders: DEFAULT_MAX_CONCURRENT_RENDERS,
            strict_templates: false,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

/// Builder for [`DocumentServiceConfig`] with validation.
///
/// # Validation
///
/// The [`build()`](Self::build) method checks:
/// - `render_timeout` must be non-zero
/// - `max_concurrent_renders` must be greater than 0
/// - `bind_addr` must not be empty
#[derive(Debug, Clone, Default)]
pub struct DocumentServiceConfigBuilder {
    config: DocumentServiceConfig,
}

impl DocumentServiceConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: DocumentServiceConfig::default(),
        }
    }

    /// Set an explicit browser executable path.
    ///
    /// An empty string is treated the same as no override.
    pub fn chrome_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.config.chrome_path = if path.is_empty() { None } else { Some(path) };
        self
    }

    /// Set the bound on a single conversion.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use pdf_template_service::DocumentServiceConfigBuilder;
    ///
    /// let config = DocumentServiceConfigBuilder::new()
    ///     .render_timeout(Duration::from_secs(15))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.render_timeout, Duration::from_secs(15));
    /// ```
    pub fn render_timeout(mut self, timeout: Duration) -> Self {
        self.config.render_timeout = timeout;
        self
    }

    /// Set the boundary concurrency limit (must be > 0).
    pub fn max_concurrent_renders(mut self, limit: usize) -> Self {
        self.config.max_concurrent_renders = limit;
        self
    }

    /// Enable or disable strict template rendering.
    pub fn strict_templates(mut self, strict: bool) -> Self {
        self.config.strict_templates = strict;
        self
    }

    /// Set the server bind address.
    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.bind_addr = addr.into();
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value is out of range.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use pdf_template_service::DocumentServiceConfigBuilder;
    ///
    /// assert!(DocumentServiceConfigBuilder::new().build().is_ok());
    /// assert!(DocumentServiceConfigBuilder::new().max_concurrent_renders(0).build().is_err());
    /// assert!(DocumentServiceConfigBuilder::new().render_timeout(Duration::ZERO).build().is_err());
    /// ```
    pub fn build(self) -> Result<DocumentServiceConfig, ConfigError> {
        if self.config.render_timeout.is_zero() {
            return Err("render_timeout must be greater than 0".into());
        }

        if self.config.max_concurrent_renders == 0 {
            return Err("max_concurrent_renders must be greater than 0".into());
        }

        if self.config.bind_addr.trim().is_empty() {
            return Err("bind_addr cannot be empty".into());
        }

        Ok(self.config)
    }
}

// ============================================================================
// Environment Configuration (feature-gated)
// ============================================================================

/// Environment-based configuration loading.
///
/// Only available with the `env-config` feature. Variables are read from
/// the process environment after loading an optional `app.env` file.
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `CHROME_PATH` | String | unset | Browser executable override |
/// | `PDF_RENDER_TIMEOUT_SECONDS` | u64 | 60 | Conversion bound |
/// | `PDF_MAX_CONCURRENT_RENDERS` | usize | 4 | Boundary concurrency |
/// | `PDF_TEMPLATE_STRICT` | bool | false | Missing template fields are errors |
/// | `PDF_SERVICE_ADDR` | String | `0.0.0.0:8080` | Bind address |
///
/// # Example `app.env` File
///
/// ```text
/// PDF_RENDER_TIMEOUT_SECONDS=30
/// PDF_MAX_CONCURRENT_RENDERS=8
///
/// # Browser (optional)
/// # CHROME_PATH=/usr/bin/google-chrome
/// ```
#[cfg(feature = "env-config")]
pub mod env {
    use super::*;

    /// Default environment file name.
    pub const ENV_FILE_NAME: &str = "app.env";

    /// Load environment variables from `app.env`.
    ///
    /// Called by [`from_env`]; exposed for callers that need the variables
    /// earlier.
    pub fn load_env_file() -> Result<std::path::PathBuf, dotenvy::Error> {
        dotenvy::from_filename(ENV_FILE_NAME)
    }

    /// Load configuration from environment variables.
    ///
    /// Unparseable values fall back to their defaults; out-of-range values
    /// are rejected by the builder.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the resulting configuration is invalid.
    pub fn from_env() -> Result<DocumentServiceConfig, ConfigError> {
        match load_env_file() {
            Ok(path) => {
                log::info!("📄 Loaded configuration from: {:?}", path);
            }
            Err(e) => {
                log::debug!(
                    "📄 No {} file found or failed to load: {} (using environment variables and defaults)",
                    ENV_FILE_NAME,
                    e
                );
            }
        }

        from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// [`from_env`] passes `std::env::var`; tests pass a map.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<DocumentServiceConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chrome_path = lookup("CHROME_PATH").unwrap_or_default();

        let timeout_seconds = lookup("PDF_RENDER_TIMEOUT_SECONDS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RENDER_TIMEOUT_SECS);

        let max_concurrent = lookup("PDF_MAX_CONCURRENT_RENDERS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONCURRENT_RENDERS);

        let strict = lookup("PDF_TEMPLATE_STRICT")
            .and_then(|s| parse_bool(&s))
            .unwrap_or(false);

        let bind_addr =
            lookup("PDF_SERVICE_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        log::info!("🔧 Loading service configuration from environment:");
        if chrome_path.is_empty() {
            log::info!("   - Chrome path: auto-detect");
        } else {
            log::info!("   - Chrome path: {}", chrome_path);
        }
        log::info!("   - Render timeout: {}s", timeout_seconds);
        log::info!("   - Max concurrent renders: {}", max_concurrent);
        log::info!("   - Strict templates: {}", strict);
        log::info!("   - Bind address: {}", bind_addr);

        DocumentServiceConfigBuilder::new()
            .chrome_path(chrome_path)
            .render_timeout(Duration::from_secs(timeout_seconds))
            .max_concurrent_renders(max_concurrent)
            .strict_templates(strict)
            .bind_addr(bind_addr)
            .build()
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::collections::HashMap;

        fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
            let map: HashMap<String, String> = pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            move |key| map.get(key).cloned()
        }

        #[test]
        fn test_from_lookup_defaults() {
            let config = from_lookup(lookup_from(&[])).unwrap();
            assert_eq!(config, DocumentServiceConfig::default());
        }

        #[test]
        fn test_from_lookup_reads_all_values() {
            let config = from_lookup(lookup_from(&[
                ("CHROME_PATH", "/custom/path"),
                ("PDF_RENDER_TIMEOUT_SECONDS", "15"),
                ("PDF_MAX_CONCURRENT_RENDERS", "2"),
                ("PDF_TEMPLATE_STRICT", "on"),
                ("PDF_SERVICE_ADDR", "127.0.0.1:9000"),
            ]))
            .unwrap();

            assert_eq!(config.chrome_path.as_deref(), Some("/custom/path"));
            assert_eq!(config.render_timeout, Duration::from_secs(15));
            assert_eq!(config.max_concurrent_renders, 2);
            assert!(config.strict_templates);
            assert_eq!(config.bind_addr, "127.0.0.1:9000");
        }

        #[test]
        fn test_from_lookup_empty_chrome_path_is_unset() {
            let config = from_lookup(lookup_from(&[("CHROME_PATH", "")])).unwrap();
            assert_eq!(config.chrome_path, None);
        }

        #[test]
        fn test_from_lookup_garbage_falls_back_to_defaults() {
            let config = from_lookup(lookup_from(&[
                ("PDF_RENDER_TIMEOUT_SECONDS", "soon"),
                ("PDF_TEMPLATE_STRICT", "maybe"),
            ]))
            .unwrap();

            assert_eq!(
                config.render_timeout,
                Duration::from_secs(DEFAULT_RENDER_TIMEOUT_SECS)
            );
            assert!(!config.strict_templates);
        }

        #[test]
        fn test_from_lookup_rejects_zero_concurrency() {
            let result = from_lookup(lookup_from(&[("PDF_MAX_CONCURRENT_RENDERS", "0")]));
            assert!(result.is_err());
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
