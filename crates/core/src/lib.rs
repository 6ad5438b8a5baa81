//! Huellitas Core - Shared domain types.
//!
//! This crate provides the common types used across the Huellitas client:
//! - `storefront` - Client-side library (stores, persistence, API client)
//! - `integration-tests` - Tests against a running backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP, no filesystem
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
