//! Runtime configuration.
//!
//! Every field has a default, so a partial object (or none at all) can be
//! deserialized from JavaScript or JSON.

use serde::{Deserialize, Serialize};

use crate::encode::DEFAULT_JPEG_QUALITY;
use crate::geometry::{DEFAULT_PADDING, SNAP_THRESHOLD_PX};

/// Uncrop endpoint of the ClipDrop API.
pub const DEFAULT_ENDPOINT: &str = "https://clipdrop-api.co/uncrop/v1";

/// Key under which the user's API key is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "clipdrop_api_key";

/// Request timeout for the outpaint call. Outpainting large images is slow.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable holding the fallback API key.
pub const API_KEY_ENV: &str = "CLIPDROP_API_KEY";

/// Environment variable overriding the endpoint (native targets only).
pub const ENDPOINT_ENV: &str = "REFRAME_UNCROP_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReframeConfig {
    /// Outpaint service URL.
    pub endpoint: String,
    /// Fallback API key used when the user has not entered one.
    pub api_key: Option<String>,
    /// JPEG quality of the output (1-100).
    pub jpeg_quality: u8,
    /// Padding around the displayed image, in display units.
    pub padding: f64,
    /// Snap distance in on-screen pixels.
    pub snap_threshold_px: f64,
    /// Outpaint request timeout. Ignored on wasm32, where the browser owns it.
    pub timeout_secs: u64,
    /// Persistence key for the user's API key.
    pub storage_key: String,
}

impl Default for ReframeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: non_blank(option_env!("CLIPDROP_API_KEY")),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            padding: DEFAULT_PADDING,
            snap_threshold_px: SNAP_THRESHOLD_PX,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl ReframeConfig {
    /// Defaults, overridden by environment variables read at run time.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(key) = non_blank(std::env::var(API_KEY_ENV).ok().as_deref()) {
            config.api_key = Some(key);
        }
        if let Some(endpoint) = non_blank(std::env::var(ENDPOINT_ENV).ok().as_deref()) {
            config.endpoint = endpoint;
        }
        config
    }

    /// Replace the fallback API key.
    pub fn with_api_key(mut self, key: Option<&str>) -> Self {
        self.api_key = non_blank(key);
        self
    }

    /// Replace the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReframeConfig::default();
        assert_eq!(config.endpoint, "https://clipdrop-api.co/uncrop/v1");
        assert_eq!(config.jpeg_quality, 92);
        assert_eq!(config.padding, 1000.0);
        assert_eq!(config.snap_threshold_px, 15.0);
        assert_eq!(config.storage_key, "clipdrop_api_key");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ReframeConfig =
            serde_json::from_str(r#"{"jpeg_quality": 80, "padding": 500}"#).unwrap();
        assert_eq!(config.jpeg_quality, 80);
        assert_eq!(config.padding, 500.0);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_with_api_key_ignores_blank() {
        let config = ReframeConfig::default().with_api_key(Some("   "));
        assert_eq!(config.api_key, None);

        let config = ReframeConfig::default().with_api_key(Some(" abc "));
        assert_eq!(config.api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_with_endpoint() {
        let config = ReframeConfig::default().with_endpoint("http://127.0.0.1:9/uncrop");
        assert_eq!(config.endpoint, "http://127.0.0.1:9/uncrop");
    }
}
