use axum::{http::StatusCode, response::Html};

use crate::views;

/// Show homepage.
pub async fn homepage() -> Html<String> {
    views::homepage()
}

/// Router fallback for unknown routes.
pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, views::not_found_page())
}
