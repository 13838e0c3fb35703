//! Item detail and review route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use tracing::instrument;

use mongomart_core::{ItemId, Review};

use super::{ItemView, item_views};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// Lowest and highest accepted star ratings.
const STARS_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

/// Review display data for templates.
#[derive(Clone)]
pub struct ReviewView {
    pub name: String,
    pub comment: String,
    pub stars: i32,
    pub date: String,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            name: review.name.clone(),
            comment: review.comment.clone(),
            stars: review.stars,
            date: review_date(&review.date),
        }
    }
}

/// Review timestamp as shown on the item page, e.g. "October 18th 2026, 3:04:05 pm".
fn review_date(date: &DateTime<Utc>) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!(
        "{} {day}{suffix} {}",
        date.format("%B"),
        date.format("%Y, %-I:%M:%S %P")
    )
}

/// Item detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "item.html")]
pub struct ItemTemplate {
    pub item: ItemView,
    pub reviews: Vec<ReviewView>,
    pub related: Vec<ItemView>,
    pub cart_user_id: String,
    /// Units of this item already in the default user's cart.
    pub in_cart: u32,
}

/// Review form submitted from the item page.
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub review: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stars: String,
}

/// Parse a star rating from form input.
fn parse_stars(raw: &str) -> Result<i32> {
    let stars: i32 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("stars must be a number, got {raw:?}")))?;
    if !STARS_RANGE.contains(&stars) {
        return Err(AppError::BadRequest(format!(
            "stars must be between {} and {}",
            STARS_RANGE.start(),
            STARS_RANGE.end()
        )));
    }
    Ok(stars)
}

/// Display an item with its reviews and related items.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
) -> Result<ItemTemplate> {
    let item = state
        .catalog()
        .get_item(item_id)
        .await?
        .ok_or_else(AppError::item_not_found)?;
    let related = state.catalog().get_related_items().await?;

    let user_id = &state.config().default_user_id;
    let in_cart = state
        .carts()
        .item_in_cart(user_id, item_id)
        .await?
        .map_or(0, |line| line.quantity);

    Ok(ItemTemplate {
        item: ItemView::from(&item),
        reviews: item.reviews.iter().map(ReviewView::from).collect(),
        related: item_views(&related),
        cart_user_id: user_id.to_string(),
        in_cart,
    })
}

/// Append a review and send the browser back to the item page.
#[instrument(skip(state, form))]
pub async fn add_review(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
    Form(form): Form<ReviewForm>,
) -> Result<Redirect> {
    let stars = parse_stars(&form.stars)?;
    let id = item_id.to_string();
    add_breadcrumb("review", "Adding review", Some(&[("item_id", id.as_str())]));

    let item = state
        .catalog()
        .add_review(item_id, &form.review, &form.name, stars)
        .await?;
    tracing::info!(reviews = item.num_reviews(), "Review added");

    Ok(Redirect::to(&format!("/item/{item_id}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_parse_stars() {
        assert_eq!(parse_stars("5").unwrap(), 5);
        assert_eq!(parse_stars(" 1 ").unwrap(), 1);
        assert!(matches!(parse_stars("0"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_stars("6"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_stars("five"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_stars(""), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_review_view_date_format() {
        let review = Review {
            name: "Ann".to_string(),
            comment: "great".to_string(),
            stars: 5,
            date: Utc.with_ymd_and_hms(2026, 10, 18, 15, 4, 5).unwrap(),
        };
        let view = ReviewView::from(&review);
        assert_eq!(view.date, "October 18th 2026, 3:04:05 pm");
    }

    #[test]
    fn test_review_date_ordinal_suffixes() {
        let on = |day| review_date(&Utc.with_ymd_and_hms(2026, 1, day, 9, 0, 0).unwrap());
        assert_eq!(on(1), "January 1st 2026, 9:00:00 am");
        assert_eq!(on(2), "January 2nd 2026, 9:00:00 am");
        assert_eq!(on(3), "January 3rd 2026, 9:00:00 am");
        assert_eq!(on(4), "January 4th 2026, 9:00:00 am");
        assert_eq!(on(11), "January 11th 2026, 9:00:00 am");
        assert_eq!(on(12), "January 12th 2026, 9:00:00 am");
        assert_eq!(on(13), "January 13th 2026, 9:00:00 am");
        assert_eq!(on(21), "January 21st 2026, 9:00:00 am");
        assert_eq!(on(22), "January 22nd 2026, 9:00:00 am");
        assert_eq!(on(31), "January 31st 2026, 9:00:00 am");
    }
}
