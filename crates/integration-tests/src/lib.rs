//! Integration tests for the Huellitas client.
//!
//! These tests exercise [`huellitas_storefront::api::ApiClient`] against a
//! real backend and are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Point at a running backend (defaults to http://localhost:8000/api/v1/)
//! export HUELLITAS_API_BASE_URL=http://localhost:8000/api/v1/
//!
//! # Seeded test credentials for the auth tests
//! export HUELLITAS_TEST_EMAIL=test@example.com
//! export HUELLITAS_TEST_PASSWORD=...
//!
//! cargo test -p huellitas-integration-tests -- --ignored
//! ```

use huellitas_storefront::api::{ApiClient, TokenCell};
use huellitas_storefront::config::ClientConfig;

/// Install a tracing subscriber for test output, once per process.
///
/// `RUST_LOG` controls verbosity; defaults to info for our crates.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "huellitas_storefront=info".into());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build an anonymous API client from the environment.
///
/// # Panics
///
/// Panics if the configuration or HTTP client cannot be built; tests
/// cannot run without either.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn test_client() -> ApiClient {
    init_tracing();
    let config = ClientConfig::from_env().unwrap();
    ApiClient::new(&config, TokenCell::new()).unwrap()
}

/// Seeded test credentials from the environment, if configured.
#[must_use]
pub fn test_credentials() -> Option<(String, String)> {
    let email = std::env::var("HUELLITAS_TEST_EMAIL").ok()?;
    let password = std::env::var("HUELLITAS_TEST_PASSWORD").ok()?;
    Some((email, password))
}
