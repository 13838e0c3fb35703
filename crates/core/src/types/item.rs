//! Catalog items and their embedded reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ItemId;
use super::price::Price;

/// A purchasable catalog entry.
///
/// Reviews are embedded in the item and ordered chronologically; they are
/// only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub slogan: String,
    pub category: String,
    pub price: Price,
    #[serde(default)]
    pub img_url: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Item {
    /// Number of reviews left on this item.
    #[must_use]
    pub fn num_reviews(&self) -> usize {
        self.reviews.len()
    }

    /// Average star rating, or `0.0` when nobody has reviewed the item.
    ///
    /// Always derived from the reviews; never stored.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_stars(&self) -> f64 {
        if self.reviews.is_empty() {
            return 0.0;
        }
        let total: i64 = self.reviews.iter().map(|r| i64::from(r.stars)).sum();
        total as f64 / self.reviews.len() as f64
    }

    /// Whether the item belongs to `category`. The synthetic "All" category
    /// matches every item.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        super::category::category_filter(category).is_none_or(|c| self.category == c)
    }
}

/// A customer review embedded in an [`Item`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub name: String,
    pub comment: String,
    pub stars: i32,
    /// Assigned when the review is appended, never taken from the client.
    pub date: DateTime<Utc>,
}

impl Review {
    /// Create a review dated now.
    #[must_use]
    pub fn new(name: impl Into<String>, comment: impl Into<String>, stars: i32) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
            stars,
            date: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn hoodie() -> Item {
        Item {
            id: ItemId::new(1),
            title: "Gray Hooded Sweatshirt".to_string(),
            description: "The top hooded sweatshirt we offer".to_string(),
            slogan: "Made of 100% cotton".to_string(),
            category: "Apparel".to_string(),
            price: Price::new("29.99".parse().unwrap()),
            img_url: "/img/products/hoodie.jpg".to_string(),
            reviews: Vec::new(),
        }
    }

    #[test]
    fn test_average_stars_without_reviews_is_zero() {
        assert!(hoodie().average_stars().abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_stars() {
        let mut item = hoodie();
        item.reviews.push(Review::new("Ann", "great", 5));
        item.reviews.push(Review::new("Bob", "fine", 2));
        assert!((item.average_stars() - 3.5).abs() < f64::EPSILON);
        assert_eq!(item.num_reviews(), 2);
    }

    #[test]
    fn test_in_category() {
        let item = hoodie();
        assert!(item.in_category("Apparel"));
        assert!(item.in_category("All"));
        assert!(!item.in_category("apparel"));
        assert!(!item.in_category("Kitchen"));
    }

    #[test]
    fn test_deserialize_without_reviews() {
        let item: Item = serde_json::from_str(
            r#"{"id": 2, "title": "Coffee Mug", "category": "Kitchen", "price": "12.50"}"#,
        )
        .unwrap();
        assert_eq!(item.id, ItemId::new(2));
        assert!(item.reviews.is_empty());
        assert!(item.slogan.is_empty());
    }
}
