//! Core types for Faucet Store.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod callable;
pub mod category;
pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod profile;
pub mod status;
pub mod user;

pub use callable::CallableCode;
pub use category::{Category, CategoryError};
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{NewOrder, Order, OrderItem, OrderUpdate, ShippingAddress};
pub use price::{CurrencyCode, Price, PriceError};
pub use product::{Product, ProductDraft, ProductSpecs};
pub use profile::{Profile, ProfileField};
pub use status::*;
pub use user::SessionUser;
