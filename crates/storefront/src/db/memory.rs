//! In-process store implementing both [`CatalogStore`] and [`CartStore`].
//!
//! Follows the same contracts as the `PostgreSQL` stores. Text search is a
//! case-insensitive match of whole words, any query word being enough. Query
//! words on the `PostgreSQL` English stop list are dropped, so a query made
//! only of stop words matches nothing. There is no stemming.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use mongomart_core::{
    Cart, CartLine, CategorySummary, Item, ItemId, PageRequest, Review, UserId,
    summarize_categories,
};

use super::{CartStore, CatalogStore, MAX_CART_QUANTITY, RELATED_ITEMS_LIMIT, RepositoryError};

#[derive(Debug, Default)]
struct Inner {
    /// Keyed by id, so iteration is already in listing order.
    items: BTreeMap<ItemId, Item>,
    /// Lines per user as `(item, quantity)`, in the order first added.
    carts: HashMap<UserId, Vec<(ItemId, u32)>>,
}

impl Inner {
    fn cart(&self, user_id: &UserId) -> Cart {
        let items = self
            .carts
            .get(user_id)
            .into_iter()
            .flatten()
            .filter_map(|(item_id, quantity)| {
                self.items.get(item_id).map(|item| CartLine {
                    quantity: *quantity,
                    ..CartLine::for_item(item)
                })
            })
            .collect();

        Cart {
            user_id: user_id.clone(),
            items,
        }
    }
}

/// Store that keeps everything in memory. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with `items`. Later items replace earlier ones with
    /// the same id.
    #[must_use]
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let inner = Inner {
            items: items.into_iter().map(|item| (item.id, item)).collect(),
            carts: HashMap::new(),
        };
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    /// Insert or replace a single item.
    pub async fn insert_item(&self, item: Item) {
        self.inner.write().await.items.insert(item.id, item);
    }
}

/// Lowercased alphanumeric words of `text`.
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Whether any word of `terms` appears in the item's searchable text.
fn matches_search(item: &Item, terms: &[String]) -> bool {
    [&item.title, &item.slogan, &item.description]
        .into_iter()
        .flat_map(|field| words(field))
        .any(|word| terms.contains(&word))
}

/// `PostgreSQL`'s `english.stop` dictionary, which `plainto_tsquery` drops.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "did", "do", "does", "doing", "don", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "s", "same", "she",
    "should", "so", "some", "such", "t", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "you", "your", "yours", "yourself",
    "yourselves",
];

fn search_terms(query: &str) -> Vec<String> {
    words(query)
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<CategorySummary>, RepositoryError> {
        let inner = self.inner.read().await;
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for item in inner.items.values() {
            *counts.entry(item.category.as_str()).or_insert(0) += 1;
        }
        Ok(summarize_categories(
            counts.into_iter().map(|(name, count)| (name.to_owned(), count)),
        ))
    }

    async fn list_items(
        &self,
        category: &str,
        page: PageRequest,
    ) -> Result<Vec<Item>, RepositoryError> {
        let inner = self.inner.read().await;
        let filtered: Vec<&Item> = inner
            .items
            .values()
            .filter(|item| item.in_category(category))
            .collect();
        Ok(page.slice(&filtered).iter().map(|item| (*item).clone()).collect())
    }

    async fn count_items(&self, category: &str) -> Result<u64, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .values()
            .filter(|item| item.in_category(category))
            .count() as u64)
    }

    async fn search_items(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Vec<Item>, RepositoryError> {
        let terms = search_terms(query);
        let inner = self.inner.read().await;
        let matched: Vec<&Item> = inner
            .items
            .values()
            .filter(|item| matches_search(item, &terms))
            .collect();
        Ok(page.slice(&matched).iter().map(|item| (*item).clone()).collect())
    }

    async fn count_search_items(&self, query: &str) -> Result<u64, RepositoryError> {
        let terms = search_terms(query);
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .values()
            .filter(|item| matches_search(item, &terms))
            .count() as u64)
    }

    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        Ok(self.inner.read().await.items.get(&id).cloned())
    }

    async fn get_related_items(&self) -> Result<Vec<Item>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .values()
            .take(RELATED_ITEMS_LIMIT as usize)
            .cloned()
            .collect())
    }

    async fn add_review(
        &self,
        item_id: ItemId,
        comment: &str,
        name: &str,
        stars: i32,
    ) -> Result<Item, RepositoryError> {
        let mut inner = self.inner.write().await;
        let item = inner
            .items
            .get_mut(&item_id)
            .ok_or(RepositoryError::NotFound)?;
        item.reviews.push(Review::new(name, comment, stars));
        Ok(item.clone())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn get_cart(&self, user_id: &UserId) -> Result<Cart, RepositoryError> {
        Ok(self.inner.read().await.cart(user_id))
    }

    async fn item_in_cart(
        &self,
        user_id: &UserId,
        item_id: ItemId,
    ) -> Result<Option<CartLine>, RepositoryError> {
        Ok(self.inner.read().await.cart(user_id).line(item_id).cloned())
    }

    async fn add_item(&self, user_id: &UserId, item: &Item) -> Result<Cart, RepositoryError> {
        let mut inner = self.inner.write().await;
        if !inner.items.contains_key(&item.id) {
            return Err(RepositoryError::NotFound);
        }

        let lines = inner.carts.entry(user_id.clone()).or_default();
        match lines.iter_mut().find(|(id, _)| *id == item.id) {
            Some((_, quantity)) if *quantity >= MAX_CART_QUANTITY => {
                return Err(RepositoryError::QuantityLimit);
            }
            Some((_, quantity)) => *quantity += 1,
            None => lines.push((item.id, 1)),
        }

        Ok(inner.cart(user_id))
    }

    async fn update_quantity(
        &self,
        user_id: &UserId,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<Cart, RepositoryError> {
        if quantity > MAX_CART_QUANTITY {
            return Err(RepositoryError::QuantityLimit);
        }
        let mut inner = self.inner.write().await;
        let lines = inner
            .carts
            .get_mut(user_id)
            .ok_or(RepositoryError::NotFound)?;
        let position = lines
            .iter()
            .position(|(id, _)| *id == item_id)
            .ok_or(RepositoryError::NotFound)?;

        if quantity == 0 {
            lines.remove(position);
        } else if let Some(line) = lines.get_mut(position) {
            line.1 = quantity;
        }

        Ok(inner.cart(user_id))
    }
}
