use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{is_unique_violation, AppError};
use crate::schemas::AppState;

/// Name of the session cookie holding the signed user id.
pub const SESSION_COOKIE: &str = "cafehub_session";

/// Session lifetime in seconds (14 days).
const SESSION_TTL_SECS: i64 = 14 * 24 * 60 * 60;

/// Hash a plaintext password into a PHC-format argon2 string.
/// The plaintext is never persisted anywhere.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash.
/// An unparsable stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Claims carried by the session token: the user id and an expiry.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i32,
    exp: i64,
}

/// Create a signed session token for a user id.
pub fn create_session_token(user_id: i32, secret: &str) -> Result<String, AppError> {
    let claims = Claims {
        sub: user_id,
        exp: Utc::now().timestamp() + SESSION_TTL_SECS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("session token encoding failed: {e}")))
}

/// Extract the user id from a session token, or `None` when the token is
/// missing a valid signature or has expired.
pub fn verify_session_token(token: &str, secret: &str) -> Option<i32> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims.sub)
    .ok()
}

/// `Set-Cookie` value attaching a session token.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value clearing the session.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

fn cookie_value(parts: &Parts, name: &str) -> Option<String> {
    let raw = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// Fields collected by the signup form.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub description: Option<String>,
    pub image_url: String,
}

/// Hash the password and persist a new user.
///
/// A username or email collision surfaces from the storage layer's unique
/// constraints and is mapped to `DuplicateKey`.
pub async fn register(db: &DatabaseConnection, new_user: NewUser) -> Result<user::Model, AppError> {
    let hashed = hash_password(&new_user.password)?;

    let active = user::ActiveModel {
        username: Set(new_user.username),
        email: Set(new_user.email),
        first_name: Set(new_user.first_name),
        last_name: Set(new_user.last_name),
        description: Set(new_user.description),
        image_url: Set(new_user.image_url),
        hashed_password: Set(hashed),
        admin: Set(false),
        ..Default::default()
    };

    match active.insert(db).await {
        Ok(user) => Ok(user),
        Err(db_error) if is_unique_violation(&db_error) => Err(AppError::DuplicateKey(
            "Username or email already taken".to_string(),
        )),
        Err(db_error) => Err(db_error.into()),
    }
}

/// Look up a user by username and verify the password.
///
/// A wrong username and a wrong password are indistinguishable to the
/// caller; both yield `None`.
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<Option<user::Model>, AppError> {
    let found = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    Ok(found.filter(|user| verify_password(password, &user.hashed_password)))
}

/// The authenticated user derived from the session cookie, if any.
///
/// Re-derived on every request; an absent, invalid, or expired cookie (or a
/// session pointing at a deleted user) leaves the request anonymous.
pub struct OptionalUser(pub Option<user::Model>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = cookie_value(parts, SESSION_COOKIE) else {
            return Ok(OptionalUser(None));
        };

        let Some(user_id) = verify_session_token(&token, &state.session_secret) else {
            debug!("session cookie failed verification");
            return Ok(OptionalUser(None));
        };

        let user = user::Entity::find_by_id(user_id).one(&state.db).await?;
        Ok(OptionalUser(user))
    }
}

/// Admin capability check, applied before any cafe create/edit handler body
/// runs. Anonymous and non-admin callers are both rejected with a 401.
pub struct AdminUser(pub user::Model);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let OptionalUser(user) = OptionalUser::from_request_parts(parts, state).await?;
        match user {
            Some(user) if user.admin => Ok(AdminUser(user)),
            _ => Err(AppError::Unauthorized),
        }
    }
}
