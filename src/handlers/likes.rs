use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json, Response},
};
use model::entities::{cafe, user_like_cafe};
use sea_orm::{sea_query::OnConflict, DatabaseConnection, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::auth::OptionalUser;
use crate::error::AppError;
use crate::schemas::{ApiMessage, AppState};

/// Soft message returned to anonymous callers instead of an HTTP error.
pub const NOT_LOGGED_IN_MSG: &str = "Not logged in";

/// Query parameters for the like status endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct LikesQuery {
    /// Cafe ID
    pub cafe_id: i32,
}

/// Request body for like/unlike
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LikeRequest {
    /// Cafe ID
    pub cafe_id: i32,
}

/// Whether the current user likes the cafe
#[derive(Debug, Serialize, ToSchema)]
pub struct LikeStatusResponse {
    pub likes: bool,
}

/// Acknowledges a recorded like
#[derive(Debug, Serialize, ToSchema)]
pub struct LikedResponse {
    pub liked: i32,
}

/// Acknowledges a removed like
#[derive(Debug, Serialize, ToSchema)]
pub struct UnlikedResponse {
    pub unliked: i32,
}

async fn ensure_cafe_exists(db: &DatabaseConnection, cafe_id: i32) -> Result<(), AppError> {
    if cafe::Entity::find_by_id(cafe_id).one(db).await?.is_none() {
        return Err(AppError::NotFound("cafe"));
    }
    Ok(())
}

/// True iff the like pair exists.
pub(crate) async fn has_liked(
    db: &DatabaseConnection,
    user_id: i32,
    cafe_id: i32,
) -> Result<bool, AppError> {
    let pair = user_like_cafe::Entity::find_by_id((user_id, cafe_id))
        .one(db)
        .await?;
    Ok(pair.is_some())
}

/// Record a like. Liking an already-liked cafe is a storage-level no-op:
/// the insert lands on the composite key with ON CONFLICT DO NOTHING, so
/// exactly one pair ever exists.
pub(crate) async fn like(
    db: &DatabaseConnection,
    user_id: i32,
    cafe_id: i32,
) -> Result<(), AppError> {
    ensure_cafe_exists(db, cafe_id).await?;

    user_like_cafe::Entity::insert(user_like_cafe::ActiveModel {
        user_id: Set(user_id),
        cafe_id: Set(cafe_id),
    })
    .on_conflict(
        OnConflict::columns([
            user_like_cafe::Column::UserId,
            user_like_cafe::Column::CafeId,
        ])
        .do_nothing()
        .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    Ok(())
}

/// Remove a like if present. Removing an absent pair is a no-op.
pub(crate) async fn unlike(
    db: &DatabaseConnection,
    user_id: i32,
    cafe_id: i32,
) -> Result<(), AppError> {
    ensure_cafe_exists(db, cafe_id).await?;

    let result = user_like_cafe::Entity::delete_by_id((user_id, cafe_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        debug!("user {user_id} unliked cafe {cafe_id} they had not liked");
    }

    Ok(())
}

fn not_logged_in() -> Response {
    Json(ApiMessage {
        error: NOT_LOGGED_IN_MSG.to_string(),
    })
    .into_response()
}

/// Check whether the current user has liked a cafe
#[utoipa::path(
    get,
    path = "/api/likes",
    tag = "likes",
    params(
        ("cafe_id" = i32, Query, description = "Cafe ID"),
    ),
    responses(
        (status = 200, description = "Like status, or a soft error when not logged in", body = LikeStatusResponse)
    )
)]
#[instrument(skip(state, user))]
pub async fn likes_status(
    user: OptionalUser,
    Query(query): Query<LikesQuery>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let Some(user) = user.0 else {
        return Ok(not_logged_in());
    };

    let likes = has_liked(&state.db, user.id, query.cafe_id).await?;
    Ok(Json(LikeStatusResponse { likes }).into_response())
}

/// Like a cafe as the current user
#[utoipa::path(
    post,
    path = "/api/like",
    tag = "likes",
    request_body = LikeRequest,
    responses(
        (status = 200, description = "Like recorded, or a soft error when not logged in", body = LikedResponse),
        (status = 404, description = "Cafe not found")
    )
)]
#[instrument(skip(state, user))]
pub async fn like_cafe(
    user: OptionalUser,
    State(state): State<AppState>,
    Json(request): Json<LikeRequest>,
) -> Result<Response, AppError> {
    let Some(user) = user.0 else {
        return Ok(not_logged_in());
    };

    like(&state.db, user.id, request.cafe_id).await?;
    info!("user {} liked cafe {}", user.id, request.cafe_id);

    Ok(Json(LikedResponse {
        liked: request.cafe_id,
    })
    .into_response())
}

/// Unlike a cafe as the current user
#[utoipa::path(
    post,
    path = "/api/unlike",
    tag = "likes",
    request_body = LikeRequest,
    responses(
        (status = 200, description = "Like removed, or a soft error when not logged in", body = UnlikedResponse),
        (status = 404, description = "Cafe not found")
    )
)]
#[instrument(skip(state, user))]
pub async fn unlike_cafe(
    user: OptionalUser,
    State(state): State<AppState>,
    Json(request): Json<LikeRequest>,
) -> Result<Response, AppError> {
    let Some(user) = user.0 else {
        return Ok(not_logged_in());
    };

    unlike(&state.db, user.id, request.cafe_id).await?;
    info!("user {} unliked cafe {}", user.id, request.cafe_id);

    Ok(Json(UnlikedResponse {
        unliked: request.cafe_id,
    })
    .into_response())
}
