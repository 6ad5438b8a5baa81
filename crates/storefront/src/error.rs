//! Unified error handling for the client library.
//!
//! Provides a single `AppError` the UI shell can match on at the top
//! level. Screens mostly handle the layer-specific errors directly
//! (`CartError` for disabled quantity controls, `ApiError` for transient
//! notifications); `AppError` exists for the composed flows in
//! `store::StoreContext` and for callers that want one error type.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;
use crate::store::cart::CartError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Cart business rule violated.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Snapshot persistence failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Whether this error carries the cross-cutting 401 signal: the session
    /// is gone and the UI must return to the login screen.
    #[must_use]
    pub const fn requires_reauth(&self) -> bool {
        matches!(self, Self::Api(ApiError::AuthenticationExpired))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_reauth_only_for_expired_auth() {
        assert!(AppError::from(ApiError::AuthenticationExpired).requires_reauth());

        let stock = AppError::from(CartError::StockExceeded {
            requested: 6,
            available: 5,
        });
        assert!(!stock.requires_reauth());

        let status = AppError::from(ApiError::Status {
            status: 500,
            message: "boom".to_owned(),
        });
        assert!(!status.requires_reauth());
    }

    #[test]
    fn test_display_includes_source() {
        let err = AppError::from(CartError::StockExceeded {
            requested: 6,
            available: 5,
        });
        assert_eq!(
            err.to_string(),
            "Cart error: requested quantity 6 exceeds available stock 5"
        );
    }
}
