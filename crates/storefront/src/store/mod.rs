//! Client-side state stores.
//!
//! Two independent stores back the UI screens: the cart and the session.
//! Both are plain synchronous state machines - no I/O beyond a best-effort
//! snapshot write on each mutation - and are composed (and wired to each
//! other) by [`StoreContext`]. All mutation happens on the UI event loop,
//! one event at a time, so the stores take `&mut self` and need no locks.

pub mod cart;
pub mod context;
pub mod session;

pub use cart::{CartError, CartLine, CartProduct, CartState, CartStore};
pub use context::StoreContext;
pub use session::{SessionEvent, SessionStore};
