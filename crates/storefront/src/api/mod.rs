//! Backend API client.
//!
//! # Architecture
//!
//! - One [`ApiClient`] per process, cheaply cloneable via `Arc`
//! - Bearer token read from the shared [`TokenCell`] on every request; the
//!   session store publishes it there on login/logout
//! - Catalog reads cached in-memory via `moka` (5 minute TTL)
//! - No retries and no store access: a failed call surfaces a typed
//!   [`ApiError`] and the caller decides
//!
//! # The 401 policy
//!
//! Any endpoint other than login answering 401 means the token expired
//! server-side; that maps to [`ApiError::AuthenticationExpired`], which the
//! composition layer turns into a forced logout and a redirect to the login
//! screen. Login's own 401 is an ordinary
//! [`ApiError::InvalidCredentials`].
//!
//! # Example
//!
//! ```rust,ignore
//! use huellitas_storefront::api::{ApiClient, TokenCell};
//! use huellitas_storefront::config::ClientConfig;
//!
//! let config = ClientConfig::from_env()?;
//! let api = ApiClient::new(&config, TokenCell::new())?;
//!
//! let products = api.products(&Default::default()).await?;
//! let categories = api.categories().await?;
//! ```

mod cache;
mod token;
pub mod types;

pub use token::TokenCell;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use huellitas_core::{DocumentTypeId, UserId};

use crate::config::ClientConfig;
use crate::models::address::{Address, Ubigeo};
use crate::models::catalog::{
    Category, CategoryWithCount, FeaturedProduct, Product, ProductFilter,
};
use crate::models::document::DocumentType;
use crate::models::payment::PaymentMethod;
use crate::models::user::{Profile, ProfileField};

use cache::CacheValue;
use types::{
    Ack, ApiResponse, DataEnvelope, Existence, LoginRequest, LoginResponse, LookupResponse,
    PartialProfileUpdate, RegisterRequest, ResetPasswordRequest, UpdateProfileRequest,
};

/// Catalog cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Catalog cache capacity (entries).
const CACHE_CAPACITY: u64 = 100;

/// Errors that can occur when calling the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint path failed to join onto the base URL.
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A non-login endpoint answered 401: the token is no longer valid.
    #[error("authentication expired")]
    AuthenticationExpired,

    /// Login rejected the credentials.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The backend rejected the payload (422), per-field messages flattened.
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Any other non-success status.
    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },
}

/// Error body shape of the backend (Laravel-style).
#[derive(Debug, Default, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: BTreeMap<String, Vec<String>>,
}

impl ErrorBody {
    fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| fallback.to_owned())
    }

    fn flattened_errors(&self) -> Vec<String> {
        self.errors.values().flatten().cloned().collect()
    }
}

/// Client for the Huellitas backend API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: TokenCell,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig, token: TokenCell) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.clone(),
                token,
                cache,
            }),
        })
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut request = self.inner.client.get(self.endpoint(path)?);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.dispatch(request, false).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.inner.client.post(self.endpoint(path)?).json(body);
        self.dispatch(request, false).await
    }

    async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.inner.client.put(self.endpoint(path)?).json(body);
        self.dispatch(request, false).await
    }

    async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.inner.client.patch(self.endpoint(path)?).json(body);
        self.dispatch(request, false).await
    }

    /// Attach the bearer token (when present) and classify the response.
    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        from_login: bool,
    ) -> Result<T, ApiError> {
        let request = match self.inner.token.get() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body: ErrorBody = response.json().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED if from_login => Err(ApiError::InvalidCredentials(
                body.message_or("invalid email or password"),
            )),
            StatusCode::UNAUTHORIZED => Err(ApiError::AuthenticationExpired),
            StatusCode::UNPROCESSABLE_ENTITY => {
                let messages = body.flattened_errors();
                if messages.is_empty() {
                    Err(ApiError::Validation(vec![
                        body.message_or("validation failed"),
                    ]))
                } else {
                    Err(ApiError::Validation(messages))
                }
            }
            _ => Err(ApiError::Status {
                status: status.as_u16(),
                message: body.message_or("request failed"),
            }),
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List products, optionally filtered by category and/or search text.
    ///
    /// Results are cached per filter combination for five minutes.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ApiError> {
        let query = filter.to_query();
        let key = format!("products?{query:?}");

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            debug!("catalog cache hit");
            return Ok(products);
        }

        let envelope: DataEnvelope<Vec<Product>> = self.get_json("products", &query).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Products(envelope.data.clone()))
            .await;
        Ok(envelope.data)
    }

    /// Products highlighted on the landing page.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<Vec<FeaturedProduct>, ApiError> {
        let key = "products/featured".to_owned();

        if let Some(CacheValue::FeaturedProducts(products)) = self.inner.cache.get(&key).await {
            debug!("catalog cache hit");
            return Ok(products);
        }

        let products: Vec<FeaturedProduct> = self.get_json("products/featured", &[]).await?;
        self.inner
            .cache
            .insert(key, CacheValue::FeaturedProducts(products.clone()))
            .await;
        Ok(products)
    }

    /// List product categories.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let key = "categories".to_owned();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&key).await {
            debug!("catalog cache hit");
            return Ok(categories);
        }

        let envelope: DataEnvelope<Vec<Category>> = self.get_json("categories", &[]).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Categories(envelope.data.clone()))
            .await;
        Ok(envelope.data)
    }

    /// Category summaries with product counts, for the landing page.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn categories_with_counts(&self) -> Result<Vec<CategoryWithCount>, ApiError> {
        let key = "categories/product-counts".to_owned();

        if let Some(CacheValue::CategoryCounts(counts)) = self.inner.cache.get(&key).await {
            debug!("catalog cache hit");
            return Ok(counts);
        }

        let counts: Vec<CategoryWithCount> =
            self.get_json("categories/product-counts", &[]).await?;
        self.inner
            .cache
            .insert(key, CacheValue::CategoryCounts(counts.clone()))
            .await;
        Ok(counts)
    }

    // =========================================================================
    // Registration & authentication
    // =========================================================================

    /// Identity document types offered on the registration form.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn document_types(&self) -> Result<Vec<DocumentType>, ApiError> {
        self.get_json("document-types", &[]).await
    }

    /// Register a new user account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` on rejected fields, or any transport
    /// error.
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<Ack, ApiError> {
        self.post_json("auth/register", request).await
    }

    /// Log in, returning the identity and bearer token.
    ///
    /// The caller (the store context) is responsible for handing the pair
    /// to the session store; this client never mutates stores.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidCredentials` for rejected logins.
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let req = self
            .inner
            .client
            .post(self.endpoint("auth/login")?)
            .json(request);
        self.dispatch(req, true).await
    }

    /// Send an email verification code during registration.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn send_verification_code(&self, email: &str) -> Result<Ack, ApiError> {
        self.post_json("auth/verify-email", &serde_json::json!({ "email": email }))
            .await
    }

    /// Whether a username is already registered.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn username_exists(&self, username: &str) -> Result<bool, ApiError> {
        let existence: Existence = self
            .post_json(
                "auth/check-username",
                &serde_json::json!({ "username": username }),
            )
            .await?;
        Ok(existence.exists)
    }

    /// Whether an identity document is already registered.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn document_exists(
        &self,
        document_number: &str,
        document_type_id: DocumentTypeId,
    ) -> Result<bool, ApiError> {
        let existence: Existence = self
            .post_json(
                "auth/check-document",
                &serde_json::json!({
                    "document_number": document_number,
                    "document_type_id": document_type_id,
                }),
            )
            .await?;
        Ok(existence.exists)
    }

    // =========================================================================
    // Password reset
    // =========================================================================

    /// Request a password reset email.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn request_password_reset(&self, email: &str) -> Result<Ack, ApiError> {
        self.post_json(
            "auth/forgot-password",
            &serde_json::json!({ "email": email }),
        )
        .await
    }

    /// Check a password reset token before showing the reset form.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn verify_reset_token(&self, email: &str, token: &str) -> Result<Ack, ApiError> {
        self.post_json(
            "auth/verify-reset-token",
            &serde_json::json!({ "email": email, "token": token }),
        )
        .await
    }

    /// Set a new password using a reset token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` on password policy failures.
    #[instrument(skip(self, request))]
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<Ack, ApiError> {
        self.post_json("auth/reset-password", request).await
    }

    // =========================================================================
    // Profile & addresses
    // =========================================================================

    /// Fetch the full profile for a user.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn profile(&self, user_id: UserId) -> Result<Profile, ApiError> {
        let response: ApiResponse<Profile> =
            self.get_json(&format!("profile/{user_id}"), &[]).await?;
        Ok(response.data)
    }

    /// Replace the editable profile sections (PUT).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` on rejected fields.
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: UserId,
        request: &UpdateProfileRequest,
    ) -> Result<Profile, ApiError> {
        let response: ApiResponse<Profile> = self
            .put_json(&format!("profile/{user_id}"), request)
            .await?;
        Ok(response.data)
    }

    /// Update a subset of profile fields (PATCH).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` on rejected fields.
    #[instrument(skip(self, update))]
    pub async fn patch_profile(
        &self,
        user_id: UserId,
        update: &PartialProfileUpdate,
    ) -> Result<Profile, ApiError> {
        let response: ApiResponse<Profile> = self
            .patch_json(&format!("profile/{user_id}"), update)
            .await?;
        Ok(response.data)
    }

    /// Update a single profile field, as the inline editors do.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` on rejected values.
    #[instrument(skip(self, value))]
    pub async fn update_profile_field(
        &self,
        user_id: UserId,
        field: ProfileField,
        value: String,
    ) -> Result<Profile, ApiError> {
        self.patch_profile(user_id, &PartialProfileUpdate::from_field(field, value))
            .await
    }

    /// Fetch the user's shipping address, if one is saved.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn address(&self, user_id: UserId) -> Result<Option<Address>, ApiError> {
        let response: ApiResponse<Option<Address>> = self
            .get_json(&format!("profile/{user_id}/address"), &[])
            .await?;
        Ok(response.data)
    }

    /// Create or replace the user's shipping address.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` on rejected fields.
    #[instrument(skip(self, address))]
    pub async fn save_address(
        &self,
        user_id: UserId,
        address: &Address,
    ) -> Result<Address, ApiError> {
        let response: ApiResponse<Address> = self
            .post_json(&format!("profile/{user_id}/address"), address)
            .await?;
        Ok(response.data)
    }

    // =========================================================================
    // Ubigeo
    // =========================================================================

    /// List departments for the address form.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn departments(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("ubigeo/departments", &[]).await
    }

    /// List provinces of a department.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn provinces(&self, department: &str) -> Result<Vec<String>, ApiError> {
        let path = format!("ubigeo/provinces/{}", urlencoding::encode(department));
        self.get_json(&path, &[]).await
    }

    /// List districts of a province, with their ubigeo codes.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn districts(&self, province: &str) -> Result<Vec<Ubigeo>, ApiError> {
        let path = format!("ubigeo/districts/{}", urlencoding::encode(province));
        self.get_json(&path, &[]).await
    }

    // =========================================================================
    // Payment methods & registry lookups
    // =========================================================================

    /// List the payment methods offered at checkout.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn payment_methods(&self) -> Result<Vec<PaymentMethod>, ApiError> {
        let envelope: DataEnvelope<Vec<PaymentMethod>> =
            self.get_json("payment-methods", &[]).await?;
        Ok(envelope.data)
    }

    /// Resolve a DNI against the national registry to prefill registration.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails; an unknown document is a
    /// successful response with `data: None`.
    #[instrument(skip(self))]
    pub async fn lookup_dni(&self, dni: &str) -> Result<LookupResponse, ApiError> {
        self.get_json("documents/dni", &[("number", dni.to_owned())])
            .await
    }

    /// Resolve a RUC against the national registry.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn lookup_ruc(&self, ruc: &str) -> Result<LookupResponse, ApiError> {
        self.get_json("documents/ruc", &[("number", ruc.to_owned())])
            .await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}
