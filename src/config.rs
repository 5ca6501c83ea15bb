use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// API deployment used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
/// Artificial latency of the purchase stub.
pub const DEFAULT_PURCHASE_DELAY: Duration = Duration::from_millis(1500);

pub const ENV_BASE_URL: &str = "STEALTHMATE_API_URL";
pub const ENV_PURCHASE_DELAY_MS: &str = "STEALTHMATE_PURCHASE_DELAY_MS";
pub const ENV_DEBUG: &str = "STEALTHMATE_DEBUG";
pub const ENV_STORAGE_DIR: &str = "STEALTHMATE_STORAGE_DIR";

/// Client options. Pass this into [`Client::new`](crate::Client::new).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Base URL of the auth API, e.g. `https://stealthmate.onrender.com`.
    pub base_url: String,
    /// How long the disabled purchase flow pretends to work.
    pub purchase_delay: Duration,
    /// Whether the client should print `[AUTH]` progress lines.
    pub debug: bool,
    /// Directory for the local session record. `None` uses the platform data dir.
    pub storage_dir: Option<PathBuf>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            purchase_delay: DEFAULT_PURCHASE_DELAY,
            debug: false,
            storage_dir: None,
        }
    }
}

impl ClientOptions {
    /// Reads options from `STEALTHMATE_*` environment variables, keeping the
    /// defaults for anything unset. Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Ok(url) = env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                options.base_url = url.trim().to_string();
            }
        }

        if let Ok(raw) = env::var(ENV_PURCHASE_DELAY_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => options.purchase_delay = Duration::from_millis(ms),
                Err(_) => warn!(value = %raw, "ignoring invalid {}", ENV_PURCHASE_DELAY_MS),
            }
        }

        if let Ok(raw) = env::var(ENV_DEBUG) {
            options.debug = matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        if let Ok(dir) = env::var(ENV_STORAGE_DIR) {
            if !dir.trim().is_empty() {
                options.storage_dir = Some(PathBuf::from(dir.trim()));
            }
        }

        options
    }
}
