//! Runtime configuration, read from the environment (and `.env` if present).

use std::env;
use std::path::PathBuf;

use reqwest::Url;
use thiserror::Error;

/// Shared key from api.nasa.gov, limited to a handful of requests per hour.
pub const DEMO_KEY: &str = "DEMO_KEY";

const DEFAULT_API_URL: &str = "https://api.nasa.gov/";
const DEFAULT_IMAGES_URL: &str = "https://images-api.nasa.gov/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL ({value:?}): {reason}")]
    BadUrl {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub nasa_api_key: String,
    /// Base for the picture of the day and the NEO feed.
    pub nasa_api_url: Url,
    /// Base for the image library search.
    pub nasa_images_url: Url,
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source; `from_env` passes `std::env`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let nasa_api_key = var("NASA_API_KEY").unwrap_or_else(|| DEMO_KEY.to_string());
        let nasa_api_url = base_url("NASA_API_URL", var("NASA_API_URL"), DEFAULT_API_URL)?;
        let nasa_images_url =
            base_url("NASA_IMAGES_URL", var("NASA_IMAGES_URL"), DEFAULT_IMAGES_URL)?;
        let log_dir = var("SKYWATCH_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("logs"));

        Ok(Self {
            nasa_api_key,
            nasa_api_url,
            nasa_images_url,
            log_dir,
        })
    }

    /// The shared demo key is rate limited; the UI says so in its footer.
    pub fn uses_demo_key(&self) -> bool {
        self.nasa_api_key == DEMO_KEY
    }
}

/// Parse a base URL, making sure it ends in `/` so `Url::join` appends to
/// its path instead of replacing the last segment.
fn base_url(var: &'static str, value: Option<String>, default: &str) -> Result<Url, ConfigError> {
    let mut value = value.unwrap_or_else(|| default.to_string());
    if !value.ends_with('/') {
        value.push('/');
    }
    match Url::parse(&value) {
        Ok(url) => Ok(url),
        Err(e) => Err(ConfigError::BadUrl {
            var,
            value,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_fall_back_to_demo_key() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.nasa_api_key, DEMO_KEY);
        assert!(cfg.uses_demo_key());
        assert_eq!(cfg.nasa_api_url.as_str(), "https://api.nasa.gov/");
        assert_eq!(cfg.nasa_images_url.as_str(), "https://images-api.nasa.gov/");
        assert_eq!(cfg.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn blank_key_counts_as_unset() {
        let cfg = config(&[("NASA_API_KEY", "  ")]).unwrap();
        assert!(cfg.uses_demo_key());
    }

    #[test]
    fn own_key_is_used() {
        let cfg = config(&[("NASA_API_KEY", "abc123")]).unwrap();
        assert_eq!(cfg.nasa_api_key, "abc123");
        assert!(!cfg.uses_demo_key());
    }

    #[test]
    fn base_urls_gain_trailing_slash() {
        let cfg = config(&[("NASA_API_URL", "http://localhost:8080/nasa")]).unwrap();
        assert_eq!(
            cfg.nasa_api_url.join("planetary/apod").unwrap().as_str(),
            "http://localhost:8080/nasa/planetary/apod"
        );
    }

    #[test]
    fn invalid_url_is_rejected() {
        let err = config(&[("NASA_IMAGES_URL", "not a url")]).unwrap_err();
        assert!(err.to_string().contains("NASA_IMAGES_URL"));
    }
}
