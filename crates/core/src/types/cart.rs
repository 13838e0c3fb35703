//! Shopping cart types.

use serde::{Deserialize, Serialize};

use super::id::ItemId;
use super::item::Item;
use super::price::Price;
use super::user_id::UserId;

/// One line of a cart: an item snapshot and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: ItemId,
    pub title: String,
    pub img_url: String,
    pub price: Price,
    /// Always positive; a line whose quantity drops to zero is removed.
    pub quantity: u32,
}

impl CartLine {
    /// A new line holding a single unit of `item`.
    #[must_use]
    pub fn for_item(item: &Item) -> Self {
        Self {
            item_id: item.id,
            title: item.title.clone(),
            img_url: item.img_url.clone(),
            price: item.price,
            quantity: 1,
        }
    }

    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A user's cart. Lines keep the order items were first added in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: UserId,
    pub items: Vec<CartLine>,
}

impl Cart {
    /// A cart with no lines.
    #[must_use]
    pub const fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
        }
    }

    /// Sum of every line's `price × quantity`.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// The line for `item_id`, if the item is in the cart.
    #[must_use]
    pub fn line(&self, item_id: ItemId) -> Option<&CartLine> {
        self.items.iter().find(|line| line.item_id == item_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
