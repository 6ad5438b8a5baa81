//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults target a local development
//! backend.
//!
//! - `HUELLITAS_API_BASE_URL` - Backend API root (default:
//!   `http://localhost:8000/api/v1/`)
//! - `HUELLITAS_DATA_DIR` - Directory for persisted store snapshots
//!   (default: the platform data dir, e.g. `~/.local/share/huellitas`)
//! - `HUELLITAS_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default backend API root for local development.
const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1/";

/// Default per-request timeout in seconds.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Could not determine a data directory; set HUELLITAS_DATA_DIR")]
    NoDataDir,
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API root. Always ends with a trailing slash so endpoint
    /// paths join onto it instead of replacing the last segment.
    pub api_base_url: Url,
    /// Directory where store snapshots are persisted.
    pub data_dir: PathBuf,
    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if no
    /// data directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = match std::env::var("HUELLITAS_API_BASE_URL") {
            Ok(raw) => parse_base_url(&raw)?,
            Err(_) => parse_base_url(DEFAULT_API_BASE_URL)?,
        };

        let data_dir = match std::env::var("HUELLITAS_DATA_DIR") {
            Ok(raw) => PathBuf::from(raw),
            Err(_) => default_data_dir()?,
        };

        let http_timeout = match std::env::var("HUELLITAS_HTTP_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    ConfigError::InvalidEnvVar(
                        "HUELLITAS_HTTP_TIMEOUT_SECS".to_owned(),
                        format!("not a number: {raw}"),
                    )
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            api_base_url,
            data_dir,
            http_timeout,
        })
    }
}

/// Parse and normalize the API base URL.
///
/// `Url::join` drops the last path segment when the base has no trailing
/// slash, so one is appended here if missing.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let normalized = if raw.ends_with('/') {
        raw.to_owned()
    } else {
        format!("{raw}/")
    };

    Url::parse(&normalized).map_err(|e| {
        ConfigError::InvalidEnvVar("HUELLITAS_API_BASE_URL".to_owned(), e.to_string())
    })
}

/// Platform data directory for snapshots.
fn default_data_dir() -> Result<PathBuf, ConfigError> {
    let mut dir = dirs::data_dir()
        .or_else(dirs::home_dir)
        .ok_or(ConfigError::NoDataDir)?;
    dir.push("huellitas");
    Ok(dir)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_appends_trailing_slash() {
        let url = parse_base_url("http://localhost:8000/api/v1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/");
    }

    #[test]
    fn test_parse_base_url_keeps_trailing_slash() {
        let url = parse_base_url("http://localhost:8000/api/v1/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/");
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(ConfigError::InvalidEnvVar(..))
        ));
    }

    #[test]
    fn test_joined_paths_extend_the_base() {
        let url = parse_base_url("http://localhost:8000/api/v1").unwrap();
        let joined = url.join("auth/login").unwrap();
        assert_eq!(joined.as_str(), "http://localhost:8000/api/v1/auth/login");
    }
}
