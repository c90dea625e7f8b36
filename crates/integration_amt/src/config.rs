//! AMT service configuration

use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for the AMT timetable pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmtConfig {
    /// Scheme and host of the vendor site
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Charset used when the response does not declare one
    #[serde(default = "default_fallback_charset")]
    pub fallback_charset: String,
}

fn default_base_url() -> String {
    "https://www.amt.genova.it".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("Fermata/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_fallback_charset() -> String {
    "windows-1252".to_string()
}

impl Default for AmtConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            fallback_charset: default_fallback_charset(),
        }
    }
}

impl AmtConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..Default::default()
        }
    }

    /// Full URL of a page under the vendor site
    pub(crate) fn endpoint(&self, page: &str) -> Result<Url, String> {
        let joined = format!("{}/{page}", self.base_url.trim_end_matches('/'));
        Url::parse(&joined).map_err(|e| format!("invalid base_url '{}': {e}", self.base_url))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| format!("base_url is not a valid URL: {e}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!("base_url scheme must be http or https, got {}", url.scheme()));
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
