//! Shopping cart store.
//!
//! Tracks the items a user intends to purchase, enforcing the stock
//! ceiling supplied by the caller per operation (stock lives in catalog
//! data, not here). The cart is scoped to its owning user and goes stale
//! 24 hours after its last modification; an invalid cart is cleared before
//! the next add rather than on a timer.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use huellitas_core::{ProductId, UserId};

use crate::models::catalog::Product;
use crate::storage::{JsonStore, Snapshot, StorageError};

/// Hours a cart stays valid without modification.
const CART_TTL_HOURS: i64 = 24;

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The requested quantity exceeds the caller-supplied stock ceiling.
    #[error("requested quantity {requested} exceeds available stock {available}")]
    StockExceeded { requested: u32, available: u32 },
}

/// One product entry in the cart.
///
/// Invariant: `quantity >= 1` - a line that would reach zero is removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub image_ref: String,
    pub quantity: u32,
}

impl CartLine {
    /// Price of this line (`unit_price` × `quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Product fields captured into a cart line when it is first added.
#[derive(Debug, Clone)]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub image_ref: String,
}

impl From<&Product> for CartProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            unit_price: product.unit_price,
            image_ref: product.image_path.clone().unwrap_or_default(),
        }
    }
}

/// The persisted cart state.
///
/// Invariant: at most one [`CartLine`] per product id; insertion order is
/// preserved for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub lines: Vec<CartLine>,
    /// The user this cart belongs to; `None` until the first add.
    pub owner: Option<UserId>,
    pub last_modified_at: DateTime<Utc>,
}

impl Default for CartState {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            owner: None,
            last_modified_at: Utc::now(),
        }
    }
}

impl Snapshot for CartState {
    const VERSION: u32 = 1;

    fn migrate(state: serde_json::Value, version: u32) -> Result<Self, StorageError> {
        match version {
            // v0 predates owner scoping and expiry: backfill both fields.
            0 => {
                let mut state = state;
                if let serde_json::Value::Object(map) = &mut state {
                    map.entry("owner").or_insert(serde_json::Value::Null);
                    map.entry("last_modified_at")
                        .or_insert_with(|| serde_json::Value::String(Utc::now().to_rfc3339()));
                }
                Ok(serde_json::from_value(state)?)
            }
            other => Err(StorageError::UnsupportedVersion {
                found: other,
                latest: Self::VERSION,
            }),
        }
    }
}

/// The shopping cart store.
pub struct CartStore {
    state: CartState,
    storage: Option<JsonStore<CartState>>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create an empty, in-memory-only cart.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: CartState::default(),
            storage: None,
        }
    }

    /// Create a cart backed by a snapshot file, restoring persisted state.
    ///
    /// An unreadable snapshot is discarded with a warning; losing a cart is
    /// preferable to failing startup.
    #[must_use]
    pub fn with_storage(storage: JsonStore<CartState>) -> Self {
        let state = match storage.load() {
            Ok(Some(state)) => state,
            Ok(None) => CartState::default(),
            Err(e) => {
                warn!(error = %e, path = %storage.path().display(), "discarding unreadable cart snapshot");
                CartState::default()
            }
        };

        Self {
            state,
            storage: Some(storage),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.state.lines
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lines.is_empty()
    }

    /// The user the cart currently belongs to.
    #[must_use]
    pub const fn owner(&self) -> Option<UserId> {
        self.state.owner
    }

    /// The line for a product, if present.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.state.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Sum of `unit_price` × `quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.state.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.state.lines.iter().map(|l| l.quantity).sum()
    }

    /// Whether the cart still applies to `current_user`.
    ///
    /// False when the stored owner differs from `current_user` (regardless
    /// of age) or when the cart has not been touched for over 24 hours
    /// (regardless of owner).
    #[must_use]
    pub fn is_valid(&self, current_user: UserId) -> bool {
        self.is_valid_at(current_user, Utc::now())
    }

    fn is_valid_at(&self, current_user: UserId, now: DateTime<Utc>) -> bool {
        self.state.owner == Some(current_user) && !self.is_stale_at(now)
    }

    fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        now - self.state.last_modified_at > Duration::hours(CART_TTL_HOURS)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of `product` for `user_id`.
    ///
    /// A cart held by another user or left stale no longer applies: it is
    /// cleared and re-stamped to `user_id` before the add proceeds.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StockExceeded`] when the line would exceed
    /// `available_stock`; the failed check mutates nothing.
    pub fn add_item(
        &mut self,
        product: &CartProduct,
        available_stock: u32,
        user_id: UserId,
    ) -> Result<(), CartError> {
        let now = Utc::now();

        if !self.is_valid_at(user_id, now) {
            self.state.lines.clear();
            self.state.owner = Some(user_id);
            self.state.last_modified_at = now;
            self.persist();
        }

        let current = self.line(product.id).map_or(0, |line| line.quantity);
        let requested = current + 1;
        if requested > available_stock {
            return Err(CartError::StockExceeded {
                requested,
                available: available_stock,
            });
        }

        match self
            .state
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id)
        {
            Some(line) => line.quantity += 1,
            None => self.state.lines.push(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                unit_price: product.unit_price,
                image_ref: product.image_ref.clone(),
                quantity: 1,
            }),
        }

        self.state.last_modified_at = now;
        self.persist();
        Ok(())
    }

    /// Delete the line for `product_id`; absent lines are a no-op apart
    /// from the timestamp.
    pub fn remove_item(&mut self, product_id: ProductId) {
        self.state.lines.retain(|l| l.product_id != product_id);
        self.touch();
        self.persist();
    }

    /// Set the quantity for `product_id`.
    ///
    /// A quantity of zero behaves as [`Self::remove_item`]. Absent lines
    /// are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StockExceeded`] when `quantity` exceeds
    /// `available_stock`; the failed check mutates nothing.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
        available_stock: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            self.remove_item(product_id);
            return Ok(());
        }

        if quantity > available_stock {
            return Err(CartError::StockExceeded {
                requested: quantity,
                available: available_stock,
            });
        }

        if let Some(line) = self
            .state
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
        {
            line.quantity = quantity;
            self.touch();
            self.persist();
        }

        Ok(())
    }

    /// Increment the quantity for `product_id` by one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StockExceeded`] when the increment would exceed
    /// `available_stock`.
    pub fn increase_quantity(
        &mut self,
        product_id: ProductId,
        available_stock: u32,
    ) -> Result<(), CartError> {
        match self.line(product_id).map(|l| l.quantity) {
            Some(quantity) => self.update_quantity(product_id, quantity + 1, available_stock),
            None => Ok(()),
        }
    }

    /// Decrement the quantity for `product_id` by one, removing the line
    /// when it would drop below one. Decreasing never needs a stock check.
    pub fn decrease_quantity(&mut self, product_id: ProductId) {
        let Some(quantity) = self.line(product_id).map(|l| l.quantity) else {
            return;
        };

        if quantity <= 1 {
            self.remove_item(product_id);
        } else if let Some(line) = self
            .state
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
        {
            line.quantity = quantity - 1;
            self.touch();
            self.persist();
        }
    }

    /// Empty the cart. The owner stamp is kept; only a session end or an
    /// owner mismatch rewrites it.
    pub fn clear(&mut self) {
        self.state.lines.clear();
        self.touch();
        self.persist();
    }

    /// Clear the cart if it has gone stale, reporting whether it did.
    pub fn clear_expired(&mut self) -> bool {
        let now = Utc::now();
        if self.is_stale_at(now) {
            self.state.lines.clear();
            self.state.last_modified_at = now;
            self.persist();
            true
        } else {
            false
        }
    }

    /// Re-stamp the owner and timestamp without touching the lines.
    ///
    /// The caller is expected to have validated (and cleared) beforehand;
    /// see `StoreContext::reconcile_cart`.
    pub fn set_user(&mut self, user_id: UserId) {
        self.state.owner = Some(user_id);
        self.touch();
        self.persist();
    }

    fn touch(&mut self) {
        self.state.last_modified_at = Utc::now();
    }

    fn persist(&self) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save(&self.state) {
                warn!(error = %e, path = %storage.path().display(), "failed to persist cart snapshot");
            }
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("persisted", &self.storage.is_some())
            .finish()
    }
}
