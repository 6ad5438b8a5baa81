//! Store composition and cross-store wiring.
//!
//! The stores are plain values injected into the UI shell through this
//! context - nothing is process-global. The context owns the one piece of
//! coupling between them (a cart must not survive a session end) and the
//! one cross-cutting error policy (a 401 outside login forces logout).

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use secrecy::SecretString;
use tracing::{debug, warn};

use crate::api::types::LoginRequest;
use crate::api::{ApiClient, ApiError};
use crate::config::ClientConfig;
use crate::error::AppError;
use crate::storage::{JsonStore, files};
use crate::store::cart::CartStore;
use crate::store::session::{SessionEvent, SessionStore};

/// The injected pair of stores backing the UI screens.
pub struct StoreContext {
    session: SessionStore,
    cart: Rc<RefCell<CartStore>>,
}

impl StoreContext {
    /// Compose the stores, subscribe the cart to session events, and
    /// reconcile the cart against the current session.
    #[must_use]
    pub fn new(mut session: SessionStore, cart: CartStore) -> Self {
        let cart = Rc::new(RefCell::new(cart));

        let cart_on_logout = Rc::clone(&cart);
        session.subscribe(move |event| {
            if *event == SessionEvent::LoggedOut {
                cart_on_logout.borrow_mut().clear();
            }
        });

        let mut context = Self { session, cart };
        context.reconcile_cart();
        context
    }

    /// Load both stores from the configured data directory.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        let session =
            SessionStore::with_storage(JsonStore::in_dir(&config.data_dir, files::SESSION));
        let cart = CartStore::with_storage(JsonStore::in_dir(&config.data_dir, files::CART));
        Self::new(session, cart)
    }

    /// The session store.
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Mutable access to the session store.
    pub const fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    /// The cart store.
    ///
    /// # Panics
    ///
    /// Panics if the cart is already mutably borrowed; mutations run to
    /// completion on the UI event loop, so a live borrow across events is
    /// a bug in the caller.
    #[must_use]
    pub fn cart(&self) -> Ref<'_, CartStore> {
        self.cart.borrow()
    }

    /// Mutable access to the cart store.
    ///
    /// # Panics
    ///
    /// Panics if the cart is already borrowed (see [`Self::cart`]).
    #[must_use]
    pub fn cart_mut(&self) -> RefMut<'_, CartStore> {
        self.cart.borrow_mut()
    }

    /// A shared handle to the cart for long-lived UI components.
    #[must_use]
    pub fn cart_handle(&self) -> Rc<RefCell<CartStore>> {
        Rc::clone(&self.cart)
    }

    /// Bring the cart in line with the current session.
    ///
    /// Anonymous sessions get an empty cart. For an authenticated user the
    /// cart is validated (expiry, then owner) *before* the owner re-stamp:
    /// `set_user` refreshes the timestamp, so stamping first would mask a
    /// stale cart.
    pub fn reconcile_cart(&mut self) {
        let mut cart = self.cart.borrow_mut();

        let Some(user_id) = self.session.current_user_id() else {
            cart.clear();
            return;
        };

        if cart.clear_expired() {
            debug!(%user_id, "cleared expired cart");
        }
        if !cart.is_valid(user_id) {
            debug!(%user_id, "cart invalid for current user, clearing");
            cart.clear();
        }
        cart.set_user(user_id);
    }

    /// Log in against the backend and populate the session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidCredentials`] for rejected logins, or
    /// any transport-level `ApiError`.
    pub async fn login(
        &mut self,
        api: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<(), AppError> {
        let request = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let response = api.login(&request).await?;

        self.session
            .set_auth(response.person, SecretString::from(response.token));
        self.reconcile_cart();
        Ok(())
    }

    /// End the session. The cart clears itself via the logout event.
    pub fn logout(&mut self) {
        self.session.logout();
    }

    /// Apply the cross-cutting 401 policy to a failed API call.
    ///
    /// Returns `true` when the session was force-ended and the UI must
    /// navigate to the login screen; all other errors are left to the
    /// calling screen.
    pub fn handle_api_error(&mut self, error: &ApiError) -> bool {
        if matches!(error, ApiError::AuthenticationExpired) {
            warn!("authentication expired, forcing logout");
            self.session.logout();
            return true;
        }
        false
    }

    /// Whether the cart is valid for the current session's user.
    #[must_use]
    pub fn is_cart_valid(&self) -> bool {
        self.session
            .current_user_id()
            .is_some_and(|user_id| self.cart.borrow().is_valid(user_id))
    }
}

impl std::fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreContext")
            .field("session", &self.session)
            .field("cart", &self.cart.borrow())
            .finish()
    }
}
