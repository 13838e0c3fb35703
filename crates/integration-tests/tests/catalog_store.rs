//! Catalog store contracts, checked against the in-memory store.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use chrono::Utc;
use mongomart_core::{ALL_CATEGORIES, ItemId, PageRequest, page_count};
use mongomart_integration_tests::{item, numbered_items, sample_items};
use mongomart_storefront::db::{CatalogStore, MemoryStore, RELATED_ITEMS_LIMIT, RepositoryError};
use rust_decimal::Decimal;

fn size(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

fn ids(items: &[mongomart_core::Item]) -> Vec<i32> {
    items.iter().map(|i| i.id.as_i32()).collect()
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn test_categories_include_all_and_are_sorted() {
    let store = MemoryStore::with_items(sample_items());
    let categories = store.list_categories().await.unwrap();

    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["All", "Apparel", "Books", "Kitchen"]);

    let all = categories.iter().find(|c| c.name == ALL_CATEGORIES).unwrap();
    let others: u64 = categories
        .iter()
        .filter(|c| c.name != ALL_CATEGORIES)
        .map(|c| c.item_count)
        .sum();
    assert_eq!(all.item_count, others);
    assert_eq!(all.item_count, 5);
}

#[tokio::test]
async fn test_categories_all_sits_between_neighbours() {
    let mut items = Vec::new();
    items.extend((1..=2).map(|id| item(id, "a", "A", Decimal::ONE)));
    items.extend((3..=5).map(|id| item(id, "b", "B", Decimal::ONE)));
    let store = MemoryStore::with_items(items);

    let categories = store.list_categories().await.unwrap();
    let pairs: Vec<(&str, u64)> = categories
        .iter()
        .map(|c| (c.name.as_str(), c.item_count))
        .collect();
    assert_eq!(pairs, [("A", 2), ("All", 5), ("B", 3)]);
}

#[tokio::test]
async fn test_empty_catalog_has_only_all() {
    let store = MemoryStore::new();
    let categories = store.list_categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, ALL_CATEGORIES);
    assert_eq!(categories[0].item_count, 0);
}

// =============================================================================
// Listing and pagination
// =============================================================================

#[tokio::test]
async fn test_second_page_of_five() {
    let store = MemoryStore::with_items(numbered_items(5, "Apparel"));
    let page = store
        .list_items(ALL_CATEGORIES, PageRequest::new(1, size(2)))
        .await
        .unwrap();
    assert_eq!(ids(&page), [3, 4]);
}

#[tokio::test]
async fn test_pages_partition_the_category() {
    let store = MemoryStore::with_items(sample_items());
    let page_size = size(1);

    for category in ["All", "Apparel", "Kitchen", "Books"] {
        let count = store.count_items(category).await.unwrap();
        let pages = page_count(count, page_size).max(1);

        let mut seen = Vec::new();
        for index in 0..pages {
            let page = store
                .list_items(category, PageRequest::new(i64::try_from(index).unwrap(), page_size))
                .await
                .unwrap();
            assert!(page.len() <= 1);
            seen.extend(ids(&page));
        }

        let mut sorted = seen.clone();
        sorted.sort_unstable();
        assert_eq!(seen, sorted, "{category} pages are in id order");

        let unique: BTreeSet<i32> = seen.iter().copied().collect();
        assert_eq!(unique.len(), seen.len(), "{category} pages do not overlap");
        assert_eq!(u64::try_from(seen.len()).unwrap(), count);
    }
}

#[tokio::test]
async fn test_count_matches_full_listing() {
    let store = MemoryStore::with_items(sample_items());
    for category in ["All", "Apparel", "Kitchen", "Books", "Nope"] {
        let count = store.count_items(category).await.unwrap();
        let whole = u32::try_from(count).unwrap().max(1);
        let items = store
            .list_items(category, PageRequest::first(size(whole)))
            .await
            .unwrap();
        assert_eq!(u64::try_from(items.len()).unwrap(), count);
        assert!(items.iter().all(|i| i.in_category(category)));
    }
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let store = MemoryStore::with_items(sample_items());
    let page = store
        .list_items("Apparel", PageRequest::new(10, size(5)))
        .await
        .unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_negative_page_is_first_page() {
    let store = MemoryStore::with_items(numbered_items(5, "Apparel"));
    let page = store
        .list_items(ALL_CATEGORIES, PageRequest::new(-3, size(2)))
        .await
        .unwrap();
    assert_eq!(ids(&page), [1, 2]);
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_matches_any_term() {
    let store = MemoryStore::with_items(sample_items());
    let found = store
        .search_items("mug jacket", PageRequest::first(size(5)))
        .await
        .unwrap();
    assert_eq!(ids(&found), [2, 4]);
    assert_eq!(store.count_search_items("mug jacket").await.unwrap(), 2);
}

#[tokio::test]
async fn test_search_is_case_insensitive_and_paginated() {
    let store = MemoryStore::with_items(numbered_items(5, "Apparel"));
    let second = store
        .search_items("ITEM", PageRequest::new(1, size(2)))
        .await
        .unwrap();
    assert_eq!(ids(&second), [3, 4]);
    assert_eq!(store.count_search_items("item").await.unwrap(), 5);
}

#[tokio::test]
async fn test_empty_search_matches_nothing() {
    let store = MemoryStore::with_items(sample_items());
    assert!(
        store
            .search_items("", PageRequest::first(size(5)))
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(store.count_search_items("   ").await.unwrap(), 0);
}

#[tokio::test]
async fn test_search_ignores_stop_words() {
    let store = MemoryStore::with_items(sample_items());
    assert_eq!(store.count_search_items("the").await.unwrap(), 0);
    assert!(
        store
            .search_items("the and of", PageRequest::first(size(5)))
            .await
            .unwrap()
            .is_empty()
    );

    let found = store
        .search_items("the guide", PageRequest::first(size(5)))
        .await
        .unwrap();
    assert_eq!(ids(&found), [3]);
}

// =============================================================================
// Items and reviews
// =============================================================================

#[tokio::test]
async fn test_get_item_missing_is_none() {
    let store = MemoryStore::with_items(sample_items());
    assert!(store.get_item(ItemId::new(99)).await.unwrap().is_none());
    assert_eq!(
        store.get_item(ItemId::new(2)).await.unwrap().unwrap().title,
        "Coffee Mug"
    );
}

#[tokio::test]
async fn test_related_items_are_first_four() {
    let store = MemoryStore::with_items(sample_items());
    let related = store.get_related_items().await.unwrap();
    assert_eq!(related.len(), usize::try_from(RELATED_ITEMS_LIMIT).unwrap());
    assert_eq!(ids(&related), [1, 2, 3, 4]);
}

#[tokio::test]
async fn test_add_review_to_unreviewed_item() {
    let store = MemoryStore::with_items(sample_items());
    let before = Utc::now();

    let updated = store
        .add_review(ItemId::new(1), "great", "Ann", 5)
        .await
        .unwrap();

    assert_eq!(updated.reviews.len(), 1);
    let review = &updated.reviews[0];
    assert_eq!(review.name, "Ann");
    assert_eq!(review.comment, "great");
    assert_eq!(review.stars, 5);
    assert!(review.date >= before && review.date <= Utc::now());
}

#[tokio::test]
async fn test_reviews_are_appended() {
    let store = MemoryStore::with_items(sample_items());
    let id = ItemId::new(3);

    store.add_review(id, "first", "Ann", 4).await.unwrap();
    store.add_review(id, "second", "Bob", 2).await.unwrap();
    let item = store.add_review(id, "third", "Cy", 3).await.unwrap();

    let comments: Vec<&str> = item.reviews.iter().map(|r| r.comment.as_str()).collect();
    assert_eq!(comments, ["first", "second", "third"]);
    assert!((item.average_stars() - 3.0).abs() < f64::EPSILON);

    let stored = store.get_item(id).await.unwrap().unwrap();
    assert_eq!(stored.reviews, item.reviews);
}

#[tokio::test]
async fn test_add_review_to_missing_item() {
    let store = MemoryStore::with_items(sample_items());
    let result = store.add_review(ItemId::new(42), "nice", "Ann", 5).await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[tokio::test]
async fn test_ping() {
    assert!(MemoryStore::new().ping().await.is_ok());
}
