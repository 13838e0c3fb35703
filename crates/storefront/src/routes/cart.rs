//! Cart route handlers.
//!
//! Every cart belongs to the user named in the URL. `GET /cart` is the only
//! route that falls back to the configured default user.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use mongomart_core::{Cart, CartLine, ItemId};

use super::parse_user_id;
use crate::db::MAX_CART_QUANTITY;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub item_id: i32,
    pub title: String,
    pub img_url: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            item_id: line.item_id.as_i32(),
            title: line.title.clone(),
            img_url: line.img_url.clone(),
            price: line.price.to_string(),
            quantity: line.quantity,
            line_total: line.line_total().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub user_id: String,
    pub items: Vec<CartLineView>,
    pub total: String,
    pub item_count: u64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            user_id: cart.user_id.to_string(),
            items: cart.items.iter().map(CartLineView::from).collect(),
            total: cart.total().to_string(),
            item_count: cart.item_count(),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub cart: CartView,
    /// Set after an add so the page can confirm the change.
    pub updated: bool,
}

impl CartTemplate {
    fn new(cart: &Cart, updated: bool) -> Self {
        Self {
            cart: CartView::from(cart),
            updated,
        }
    }
}

/// Quantity form submitted from the cart page.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    #[serde(default)]
    pub quantity: String,
}

/// Redirect to the default user's cart.
pub async fn default_cart(State(state): State<AppState>) -> Redirect {
    Redirect::to(&format!("/user/{}/cart", state.config().default_user_id))
}

/// Display a user's cart.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<CartTemplate> {
    let user_id = parse_user_id(&user_id)?;
    let cart = state.carts().get_cart(&user_id).await?;
    Ok(CartTemplate::new(&cart, false))
}

/// Add one unit of an item to a user's cart.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(String, ItemId)>,
) -> Result<CartTemplate> {
    let user_id = parse_user_id(&user_id)?;
    let item = state
        .catalog()
        .get_item(item_id)
        .await?
        .ok_or_else(AppError::item_not_found)?;

    let id = item_id.to_string();
    add_breadcrumb("cart", "Adding item", Some(&[("item_id", id.as_str())]));

    let cart = state.carts().add_item(&user_id, &item).await?;
    tracing::info!(items = cart.item_count(), "Item added to cart");

    Ok(CartTemplate::new(&cart, true))
}

/// Set the quantity of a cart line; zero removes it.
#[instrument(skip(state, form))]
pub async fn update_quantity(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(String, ItemId)>,
    Form(form): Form<QuantityForm>,
) -> Result<CartTemplate> {
    let user_id = parse_user_id(&user_id)?;
    let quantity: u32 = form.quantity.trim().parse().map_err(|_| {
        AppError::BadRequest(format!(
            "quantity must be a non-negative number, got {:?}",
            form.quantity
        ))
    })?;
    if quantity > MAX_CART_QUANTITY {
        return Err(AppError::BadRequest(format!(
            "quantity cannot exceed {MAX_CART_QUANTITY}, got {quantity}"
        )));
    }

    let id = item_id.to_string();
    add_breadcrumb("cart", "Updating quantity", Some(&[("item_id", id.as_str())]));

    let cart = state
        .carts()
        .update_quantity(&user_id, item_id, quantity)
        .await?;

    Ok(CartTemplate::new(&cart, true))
}
