//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Highest star rating a review can carry.
const MAX_STARS: usize = 5;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders a rating as filled and empty stars, e.g. `★★★★☆`.
///
/// Accepts whole ratings and averages; averages are rounded to the nearest
/// star. Anything unparseable renders as zero stars.
///
/// Usage in templates: `{{ review.stars|star_rating }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn star_rating(rating: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(render_stars(&rating.to_string()))
}

fn render_stars(rating: &str) -> String {
    let rounded = rating.trim().parse::<f64>().map_or(0.0, f64::round);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = (rounded.clamp(0.0, 5.0) as usize).min(MAX_STARS);
    let mut stars = "★".repeat(filled);
    stars.push_str(&"☆".repeat(MAX_STARS - filled));
    stars
}
