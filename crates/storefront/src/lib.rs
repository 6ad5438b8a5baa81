//! Huellitas Storefront - client-side core library.
//!
//! This crate is the non-visual half of the Huellitas pet-care storefront:
//! the state stores the UI screens read and mutate, their persisted
//! snapshots, and the typed HTTP client for the backend API. The visual
//! layer (components, routing, rendering) lives in the UI shell that links
//! against this crate.
//!
//! # Architecture
//!
//! - [`store`] - Cart and session stores, composed by [`store::StoreContext`].
//!   Single-writer semantics: all mutations run synchronously on the UI
//!   event loop.
//! - [`storage`] - Versioned JSON snapshots, one file per store, written on
//!   every mutation and loaded once at startup.
//! - [`api`] - `reqwest`-based client for catalog, auth, profile, address,
//!   ubigeo, and payment-method endpoints. Catalog reads are cached for
//!   five minutes via `moka`.
//! - [`models`] - Wire types shared by the API client and the stores.
//!
//! The stores perform no I/O of their own beyond the best-effort snapshot
//! write; every network call goes through [`api::ApiClient`] and is wired to
//! the stores by the composition layer.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod store;
