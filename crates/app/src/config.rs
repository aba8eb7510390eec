//! Application configuration loaded from environment variables.

/// Demo configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `SIMULATE_CATALOG_FAILURE` — make the product source fail
/// - `SIMULATE_SUBMIT_FAILURE` — make the order transport fail
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub fail_catalog: bool,
    pub fail_submission: bool,
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            fail_catalog: env_flag("SIMULATE_CATALOG_FAILURE"),
            fail_submission: env_flag("SIMULATE_SUBMIT_FAILURE"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            fail_catalog: false,
            fail_submission: false,
        }
    }
}
