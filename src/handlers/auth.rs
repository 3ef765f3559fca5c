use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::auth::{self, NewUser};
use crate::error::{validation_messages, AppError};
use crate::schemas::{empty_string_as_none, AppState};
use crate::views;

/// Form payload for user sign up.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url(message = "Image must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Form payload for user login.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

fn logged_in_redirect(token: &str, to: &str) -> Response {
    (
        [(header::SET_COOKIE, auth::session_cookie(token))],
        Redirect::to(to),
    )
        .into_response()
}

/// Show the signup form.
#[instrument]
pub async fn signup_form() -> Html<String> {
    views::signup_page(&SignupForm::default(), &[])
}

/// Register a new user. Signing up also logs the user in.
#[instrument(skip(state, form))]
pub async fn signup_submit(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    if let Err(validation_errors) = form.validate() {
        let errors = validation_messages(&validation_errors);
        return Ok(views::signup_page(&form, &errors).into_response());
    }

    let new_user = NewUser {
        username: form.username.clone(),
        password: form.password.clone(),
        email: form.email.clone(),
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        description: form.description.clone(),
        image_url: form.image_url.clone().unwrap_or_default(),
    };

    let user = match auth::register(&state.db, new_user).await {
        Ok(user) => user,
        Err(AppError::DuplicateKey(message)) => {
            return Ok(views::signup_page(&form, &[message]).into_response());
        }
        Err(other) => return Err(other),
    };

    info!("user '{}' signed up with id {}", user.username, user.id);

    let token = auth::create_session_token(user.id, &state.session_secret)?;
    Ok(logged_in_redirect(&token, "/cafes"))
}

/// Show the login form.
#[instrument]
pub async fn login_form() -> Html<String> {
    views::login_page(&LoginForm::default(), &[])
}

/// Log a user in. A wrong username and a wrong password both render the
/// same "Invalid credentials" message.
#[instrument(skip(state, form))]
pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if let Err(validation_errors) = form.validate() {
        let errors = validation_messages(&validation_errors);
        return Ok(views::login_page(&form, &errors).into_response());
    }

    match auth::authenticate(&state.db, &form.username, &form.password).await? {
        Some(user) => {
            info!("user '{}' logged in", user.username);
            let token = auth::create_session_token(user.id, &state.session_secret)?;
            Ok(logged_in_redirect(&token, "/cafes"))
        }
        None => {
            let errors = vec!["Invalid credentials".to_string()];
            Ok(views::login_page(&form, &errors).into_response())
        }
    }
}

/// Clear the session and return to the cafe list.
#[instrument]
pub async fn logout() -> Response {
    (
        [(header::SET_COOKIE, auth::clear_session_cookie())],
        Redirect::to("/cafes"),
    )
        .into_response()
}
