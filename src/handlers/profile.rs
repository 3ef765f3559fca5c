use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use model::entities::user;
use sea_orm::{ActiveModelTrait, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::auth::OptionalUser;
use crate::error::{is_unique_violation, validation_messages, AppError};
use crate::schemas::{empty_string_as_none, AppState};
use crate::views;

/// Form payload for editing the signed-in user's profile. Username and
/// password changes have no surface here.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url(message = "Image must be a valid URL"))]
    pub image_url: Option<String>,
}

impl ProfileForm {
    fn from_model(user: &user::Model) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            description: user.description.clone(),
            email: user.email.clone(),
            image_url: if user.image_url.is_empty() {
                None
            } else {
                Some(user.image_url.clone())
            },
        }
    }
}

/// Show the signed-in user's profile.
#[instrument(skip(user))]
pub async fn show_profile(user: OptionalUser) -> Response {
    match user.0 {
        Some(user) => views::profile_page(&user).into_response(),
        None => Redirect::to("/login").into_response(),
    }
}

/// Show the profile edit form, prefilled from the current record.
#[instrument(skip(user))]
pub async fn edit_profile_form(user: OptionalUser) -> Response {
    match user.0 {
        Some(user) => views::profile_edit_page(&ProfileForm::from_model(&user), &[]).into_response(),
        None => Redirect::to("/login").into_response(),
    }
}

/// Overwrite the signed-in user's profile fields in one update.
#[instrument(skip(state, user, form))]
pub async fn edit_profile_submit(
    user: OptionalUser,
    State(state): State<AppState>,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    let Some(user) = user.0 else {
        return Ok(Redirect::to("/login").into_response());
    };

    if let Err(validation_errors) = form.validate() {
        let errors = validation_messages(&validation_errors);
        return Ok(views::profile_edit_page(&form, &errors).into_response());
    }

    let user_id = user.id;
    let mut active: user::ActiveModel = user.into();
    active.first_name = Set(form.first_name.clone());
    active.last_name = Set(form.last_name.clone());
    active.description = Set(form.description.clone());
    active.email = Set(form.email.clone());
    active.image_url = Set(form.image_url.clone().unwrap_or_default());

    match active.update(&state.db).await {
        Ok(updated) => {
            info!("user {} edited their profile", updated.id);
            Ok(Redirect::to("/profile").into_response())
        }
        Err(db_error) if is_unique_violation(&db_error) => {
            let errors = vec!["Email already taken".to_string()];
            Ok(views::profile_edit_page(&form, &errors).into_response())
        }
        Err(db_error) => {
            tracing::error!("profile update for user {user_id} failed: {db_error}");
            Err(db_error.into())
        }
    }
}
