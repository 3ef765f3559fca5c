use anyhow::Result;
use sea_orm::Database;
use std::path::PathBuf;

use crate::maps::MapClient;
use crate::schemas::AppState;

/// Initialize application state from the environment with an explicit
/// database URL.
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    dotenvy::dotenv().ok();

    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    let session_secret = match std::env::var("SESSION_SECRET") {
        Ok(secret) => secret,
        Err(_) => {
            tracing::warn!("SESSION_SECRET not set, using an insecure development default");
            "dev-secret-change-me".to_string()
        }
    };

    let api_key = std::env::var("MAPQUEST_API_KEY").ok();
    if api_key.is_none() {
        tracing::warn!("MAPQUEST_API_KEY not set, cafe map images will not be fetched");
    }
    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());
    let maps = MapClient::new(api_key, PathBuf::from(static_dir))?;

    Ok(AppState {
        db,
        session_secret,
        maps,
    })
}
