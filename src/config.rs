//! Configuration
//!
//! Backend location and the fixed thresholds used across pages.

use std::sync::OnceLock;

/// Backend used when nothing else is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// localStorage key that overrides the compiled-in backend URL
pub const API_BASE_STORAGE_KEY: &str = "scancontroll.apiBase";

/// CMYK difference considered acceptable in the compare report
pub const DIFF_LIMIT: f64 = 2.5;

/// Density difference (percent) from which ink must be added or removed
pub const DENSITY_THRESHOLD: f64 = 7.0;

/// Largest image accepted on the Pantone page
pub const MAX_PANTONE_UPLOAD_BYTES: f64 = 2.0 * 1024.0 * 1024.0;

/// Reports above this size are not rendered in the dashboard
pub const MAX_DETAIL_SIZE: u64 = 20 * 1024 * 1024;

/// Label sheet defaults
pub const DEFAULT_DPI: u32 = 96;
pub const MIN_DPI: u32 = 30;
pub const MAX_DPI: u32 = 1200;
pub const DEFAULT_LABEL_WIDTH_MM: &str = "90";
pub const DEFAULT_LABEL_HEIGHT_MM: &str = "60";
pub const DEFAULT_GAP_MM: &str = "0";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base: String,
}

impl AppConfig {
    /// Compile-time `SCANCONTROLL_API_BASE`, overridden by localStorage
    pub fn load() -> Self {
        let stored = stored_api_base();
        Self {
            api_base: resolve_api_base(option_env!("SCANCONTROLL_API_BASE"), stored),
        }
    }

    /// Absolute URL for an API path
    pub fn endpoint(&self, path: &str) -> String {
        join_url(&self.api_base, path)
    }
}

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

pub fn config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::load)
}

/// Shortcut for `config().endpoint(path)`
pub fn endpoint(path: &str) -> String {
    config().endpoint(path)
}

pub fn resolve_api_base(compiled: Option<&str>, stored: Option<String>) -> String {
    stored
        .filter(|s| !s.trim().is_empty())
        .or_else(|| compiled.filter(|s| !s.trim().is_empty()).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
        .trim()
        .to_string()
}

pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(target_arch = "wasm32")]
fn stored_api_base() -> Option<String> {
    web_sys::window()?
        .local_storage()
        .ok()??
        .get_item(API_BASE_STORAGE_KEY)
        .ok()?
}

#[cfg(not(target_arch = "wasm32"))]
fn stored_api_base() -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_stored_then_compiled() {
        assert_eq!(
            resolve_api_base(Some("http://build:9000"), Some("http://lab:8080 ".to_string())),
            "http://lab:8080"
        );
        assert_eq!(resolve_api_base(Some("http://build:9000"), Some("  ".to_string())), "http://build:9000");
        assert_eq!(resolve_api_base(None, None), DEFAULT_API_BASE);
    }

    #[test]
    fn test_join_url_single_slash() {
        assert_eq!(join_url("http://host:8080/", "/api/report"), "http://host:8080/api/report");
        assert_eq!(join_url("http://host:8080", "api/report"), "http://host:8080/api/report");
    }
}
