//! Core types for MongoMart.
//!
//! This module provides type-safe wrappers for the catalog and cart domain.

pub mod cart;
pub mod category;
pub mod id;
pub mod item;
pub mod page;
pub mod price;
pub mod user_id;

pub use cart::{Cart, CartLine};
pub use category::{ALL_CATEGORIES, CategorySummary, category_filter, summarize_categories};
pub use id::*;
pub use item::{Item, Review};
pub use page::{PageRequest, page_count};
pub use price::{Price, PriceError};
pub use user_id::{UserId, UserIdError};
