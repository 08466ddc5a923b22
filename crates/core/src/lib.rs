//! Faucet Store Core - Shared types library.
//!
//! This crate provides common types used across all Faucet Store components:
//! - `storefront` - Client core: router, cart, checkout, admin gate
//! - `functions` - Privileged callable endpoints for admin role management
//! - `cli` - Operator tooling (first-admin bootstrap, admin listing)
//!
//! # Architecture
//!
//! The core crate contains only types and pure domain rules - no I/O, no
//! HTTP clients, no async. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, catalog, profile and order records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
