use sea_orm::DatabaseConnection;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::maps::MapClient;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// HMAC secret for signing session cookies
    pub session_secret: String,
    /// Static map image fetcher
    pub maps: MapClient,
}

/// Soft JSON message returned by the likes API, e.g. for anonymous callers
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiMessage {
    /// Error message
    pub error: String,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Treat an empty or whitespace-only form field as absent.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}

/// OpenAPI documentation for the JSON endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::likes::likes_status,
        crate::handlers::likes::like_cafe,
        crate::handlers::likes::unlike_cafe,
    ),
    components(
        schemas(
            ApiMessage,
            HealthResponse,
            crate::handlers::likes::LikeRequest,
            crate::handlers::likes::LikeStatusResponse,
            crate::handlers::likes::LikedResponse,
            crate::handlers::likes::UnlikedResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "likes", description = "Cafe like/unlike endpoints"),
    ),
    info(
        title = "CafeHub API",
        description = "Cafe directory JSON API - like status and like/unlike actions",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
