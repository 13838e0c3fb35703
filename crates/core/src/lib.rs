//! MongoMart Core - Shared domain types.
//!
//! This crate provides the catalog and cart types used across all MongoMart
//! components:
//! - `storefront` - Catalog and cart web application
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no database
//! access, no HTTP. Category aggregation, pagination arithmetic, and cart
//! totals live here so every store implementation shares them.
//!
//! # Modules
//!
//! - [`types`] - Items, reviews, category summaries, pages, carts, and ids

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
