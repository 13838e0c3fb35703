//! HTTP surface of the storefront, driven through the router in-process.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use mongomart_core::{ItemId, UserId};
use mongomart_integration_tests::{default_user, memory_state, sample_items};
use mongomart_storefront::db::{CartStore, CatalogStore, MemoryStore};
use mongomart_storefront::middleware::REQUEST_ID_HEADER;
use tower::ServiceExt;

fn setup() -> (MemoryStore, Router) {
    let store = MemoryStore::with_items(sample_items());
    let app = mongomart_storefront::app(memory_state(&store));
    (store, app)
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: Router, uri: &str, form: &str) -> Response {
    app.oneshot(
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (_, app) = setup();
    let response = get(app.clone(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");

    let response = get(app, "/health/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (_, app) = setup();
    let response = app
        .oneshot(
            Request::get("/health")
                .header(REQUEST_ID_HEADER, "edge-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "edge-42");
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_home_lists_categories_and_items() {
    let (_, app) = setup();
    let response = get(app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    for category in ["All", "Apparel", "Books", "Kitchen"] {
        assert!(body.contains(category), "missing category {category}");
    }
    assert!(body.contains("Gray Hooded Sweatshirt"));
    assert!(body.contains("5 items"));
}

#[tokio::test]
async fn test_home_filters_by_category() {
    let (_, app) = setup();
    let body = body_text(get(app, "/?category=Kitchen").await).await;
    assert!(body.contains("Coffee Mug"));
    assert!(body.contains("Brown Tumbler"));
    assert!(!body.contains("Track Jacket"));
    assert!(body.contains("2 items"));
}

#[tokio::test]
async fn test_home_tolerates_garbage_page() {
    let (_, app) = setup();
    let response = get(app, "/?page=abc").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Gray Hooded Sweatshirt"));
}

#[tokio::test]
async fn test_search() {
    let (_, app) = setup();
    let response = get(app, "/search?query=mug").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Coffee Mug"));
    assert!(!body.contains("Track Jacket"));
    assert!(body.contains("1 items"));
}

// =============================================================================
// Items and reviews
// =============================================================================

#[tokio::test]
async fn test_item_page() {
    let (_, app) = setup();
    let response = get(app, "/item/4").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Track Jacket"));
    assert!(body.contains("$45.00"));
    assert!(body.contains("No reviews yet."));
}

#[tokio::test]
async fn test_missing_item_is_404() {
    let (_, app) = setup();
    let response = get(app, "/item/99").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Item not found.");
}

#[tokio::test]
async fn test_non_numeric_item_id_is_rejected() {
    let (_, app) = setup();
    let response = get(app, "/item/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_review_redirects_to_item() {
    let (store, app) = setup();
    let response = post_form(
        app.clone(),
        "/item/1/reviews",
        "review=Very+warm&name=Ann&stars=5",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/item/1");

    let item = store.get_item(ItemId::new(1)).await.unwrap().unwrap();
    assert_eq!(item.reviews.len(), 1);
    assert_eq!(item.reviews[0].comment, "Very warm");

    let body = body_text(get(app, "/item/1").await).await;
    assert!(body.contains("Very warm"));
    assert!(body.contains("5.0"));
}

#[tokio::test]
async fn test_review_with_bad_stars_is_rejected() {
    let (store, app) = setup();
    let response = post_form(app, "/item/1/reviews", "review=meh&name=Bob&stars=9").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let item = store.get_item(ItemId::new(1)).await.unwrap().unwrap();
    assert!(item.reviews.is_empty());
}

#[tokio::test]
async fn test_review_for_missing_item_is_404() {
    let (_, app) = setup();
    let response = post_form(app, "/item/99/reviews", "review=hi&name=Ann&stars=3").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_cart_redirects_to_default_user() {
    let (_, app) = setup();
    let response = get(app, "/cart").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/user/{}/cart", default_user()));
}

#[tokio::test]
async fn test_empty_cart_page() {
    let (_, app) = setup();
    let response = get(app, "/user/ann/cart").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_add_to_cart_and_increment() {
    let (store, app) = setup();

    let response = post_form(app.clone(), "/user/ann/cart/items/2", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Cart updated."));
    assert!(body.contains("Coffee Mug"));
    assert!(body.contains("$12.50"));

    let response = post_form(app, "/user/ann/cart/items/2", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("$25.00"));

    let ann = UserId::parse("ann").unwrap();
    let line = store.item_in_cart(&ann, ItemId::new(2)).await.unwrap().unwrap();
    assert_eq!(line.quantity, 2);
}

#[tokio::test]
async fn test_add_missing_item_to_cart_is_404() {
    let (_, app) = setup();
    let response = post_form(app, "/user/ann/cart/items/99", "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_quantity() {
    let (store, app) = setup();
    post_form(app.clone(), "/user/ann/cart/items/4", "").await;

    let response = post_form(app.clone(), "/user/ann/cart/items/4/quantity", "quantity=3").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("$135.00"));

    let response = post_form(app, "/user/ann/cart/items/4/quantity", "quantity=0").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Your cart is empty."));

    let ann = UserId::parse("ann").unwrap();
    assert!(store.get_cart(&ann).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_quantity_validation() {
    let (_, app) = setup();
    post_form(app.clone(), "/user/ann/cart/items/4", "").await;

    let response = post_form(app.clone(), "/user/ann/cart/items/4/quantity", "quantity=lots").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_form(app, "/user/ann/cart/items/1/quantity", "quantity=2").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_quantity_above_cap_is_rejected() {
    let (store, app) = setup();
    post_form(app.clone(), "/user/ann/cart/items/4", "").await;

    let response = post_form(app, "/user/ann/cart/items/4/quantity", "quantity=3000000000").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("cannot exceed"));

    let ann = UserId::parse("ann").unwrap();
    let line = store.item_in_cart(&ann, ItemId::new(4)).await.unwrap().unwrap();
    assert_eq!(line.quantity, 1);
}

#[tokio::test]
async fn test_item_page_shows_default_users_cart_quantity() {
    let (store, app) = setup();
    let mug = store.get_item(ItemId::new(2)).await.unwrap().unwrap();
    store.add_item(&default_user(), &mug).await.unwrap();

    let body = body_text(get(app, "/item/2").await).await;
    assert!(body.contains("1 in your"));
}
