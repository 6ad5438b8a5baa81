//! Domain models for the storefront client.
//!
//! These are the wire types of the backend API contract plus the identity
//! types held by the session store. Field names here define the JSON shape;
//! money is `rust_decimal` and timestamps are RFC 3339 via `chrono`.

pub mod address;
pub mod catalog;
pub mod document;
pub mod payment;
pub mod user;

pub use address::{Address, Ubigeo};
pub use catalog::{Category, CategoryWithCount, FeaturedProduct, Product, ProductFilter};
pub use document::{DocumentLookup, DocumentType};
pub use payment::PaymentMethod;
pub use user::{Account, Person, Profile, ProfileField, ProfilePerson};
