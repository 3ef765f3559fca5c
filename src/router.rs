use crate::handlers::{
    auth::{login_form, login_submit, logout, signup_form, signup_submit},
    cafes::{
        add_cafe_form, add_cafe_submit, cafe_detail, cafe_list, edit_cafe_form, edit_cafe_submit,
    },
    health::health_check,
    likes::{like_cafe, likes_status, unlike_cafe},
    pages::{homepage, not_found},
    profile::{edit_profile_form, edit_profile_submit, show_profile},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Homepage and health check
        .route("/", get(homepage))
        .route("/health", get(health_check))
        // Cafe directory
        .route("/cafes", get(cafe_list))
        .route("/cafes/add", get(add_cafe_form).post(add_cafe_submit))
        .route("/cafes/:cafe_id", get(cafe_detail))
        .route("/cafes/:cafe_id/edit", get(edit_cafe_form).post(edit_cafe_submit))
        // Registration and sessions
        .route("/signup", get(signup_form).post(signup_submit))
        .route("/login", get(login_form).post(login_submit))
        .route("/logout", post(logout))
        // Profile
        .route("/profile", get(show_profile))
        .route("/profile/edit", get(edit_profile_form).post(edit_profile_submit))
        // Likes JSON API
        .route("/api/likes", get(likes_status))
        .route("/api/like", post(like_cafe))
        .route("/api/unlike", post(unlike_cafe))
        // Static assets, including cached map images
        .nest_service("/static", ServeDir::new(state.maps.static_dir()))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Unknown routes get the 404 page
        .fallback(not_found)
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
