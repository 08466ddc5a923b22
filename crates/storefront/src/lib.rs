//! Faucet Store storefront library.
//!
//! The client core of the storefront: routing with animated transitions,
//! the cart, the catalog cache, checkout, the admin gate and the views they
//! render. Page effects go through a [`host::BrowserHost`] and external
//! services through the ports in [`backend`], so the whole application runs
//! and is tested without a browser.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod app;
pub mod backend;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod host;
pub mod notify;
pub mod router;
pub mod state;
pub mod views;

pub use app::Storefront;
pub use config::StorefrontConfig;
pub use error::{Result, StorefrontError};
