use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use model::entities::{cafe, city};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::auth::AdminUser;
use crate::error::{validation_messages, AppError};
use crate::schemas::{empty_string_as_none, AppState};
use crate::views;

/// Form payload for creating or editing a cafe.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CafeForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(url(message = "URL must be a valid URL"))]
    pub url: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    pub city_code: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url(message = "Image must be a valid URL"))]
    pub image_url: Option<String>,
}

impl CafeForm {
    fn from_model(cafe: &cafe::Model) -> Self {
        Self {
            name: cafe.name.clone(),
            description: cafe.description.clone(),
            url: cafe.url.clone(),
            address: cafe.address.clone(),
            city_code: cafe.city_code.clone(),
            image_url: Some(cafe.image_url.clone()),
        }
    }

    /// Validation messages plus the referential check on the city choices.
    fn check(&self, cities: &[city::Model]) -> Vec<String> {
        let mut errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(validation_errors) => validation_messages(&validation_errors),
        };
        if !cities.iter().any(|c| c.code == self.city_code) {
            errors.push("City is required".to_string());
        }
        errors
    }
}

/// City choices for the select field, name ascending.
async fn city_choices(state: &AppState) -> Result<Vec<city::Model>, AppError> {
    Ok(city::Entity::find()
        .order_by_asc(city::Column::Name)
        .all(&state.db)
        .await?)
}

async fn load_cafe(state: &AppState, cafe_id: i32) -> Result<cafe::Model, AppError> {
    cafe::Entity::find_by_id(cafe_id)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFound("cafe"))
}

/// Return list of all cafes, sorted by name ascending.
#[instrument(skip(state))]
pub async fn cafe_list(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let cafes = cafe::Entity::find()
        .order_by_asc(cafe::Column::Name)
        .all(&state.db)
        .await?;

    Ok(views::cafe_list_page(&cafes))
}

/// Show detail for one cafe.
#[instrument(skip(state))]
pub async fn cafe_detail(
    Path(cafe_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let cafe = load_cafe(&state, cafe_id).await?;
    let city = city::Entity::find_by_id(&cafe.city_code)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFound("city"))?;

    Ok(views::cafe_detail_page(&cafe, &city))
}

/// Show the admin form for adding a cafe.
#[instrument(skip(state, _admin))]
pub async fn add_cafe_form(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let cities = city_choices(&state).await?;

    Ok(views::cafe_form_page(
        "Add cafe",
        "/cafes/add",
        &CafeForm::default(),
        &cities,
        &[],
    ))
}

/// Create a cafe from the admin form and kick off its map image fetch.
#[instrument(skip(state, _admin, form))]
pub async fn add_cafe_submit(
    _admin: AdminUser,
    State(state): State<AppState>,
    Form(form): Form<CafeForm>,
) -> Result<Response, AppError> {
    let cities = city_choices(&state).await?;
    let errors = form.check(&cities);
    if !errors.is_empty() {
        return Ok(
            views::cafe_form_page("Add cafe", "/cafes/add", &form, &cities, &errors)
                .into_response(),
        );
    }

    let created = cafe::ActiveModel {
        name: Set(form.name.clone()),
        description: Set(form.description.clone()),
        url: Set(form.url.clone()),
        address: Set(form.address.clone()),
        city_code: Set(form.city_code.clone()),
        image_url: Set(form
            .image_url
            .clone()
            .unwrap_or_else(|| cafe::DEFAULT_IMAGE_URL.to_string())),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("cafe '{}' created with id {}", created.name, created.id);
    refresh_map(&state, &created, &cities);

    Ok(Redirect::to(&format!("/cafes/{}", created.id)).into_response())
}

/// Show the admin form for editing a cafe, prefilled from the record.
#[instrument(skip(state, _admin))]
pub async fn edit_cafe_form(
    _admin: AdminUser,
    Path(cafe_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let cafe = load_cafe(&state, cafe_id).await?;
    let cities = city_choices(&state).await?;

    Ok(views::cafe_form_page(
        "Edit cafe",
        &format!("/cafes/{cafe_id}/edit"),
        &CafeForm::from_model(&cafe),
        &cities,
        &[],
    ))
}

/// Overwrite all mutable fields of a cafe in one update, then re-trigger
/// the map image refresh.
#[instrument(skip(state, _admin, form))]
pub async fn edit_cafe_submit(
    _admin: AdminUser,
    Path(cafe_id): Path<i32>,
    State(state): State<AppState>,
    Form(form): Form<CafeForm>,
) -> Result<Response, AppError> {
    let existing = load_cafe(&state, cafe_id).await?;
    let cities = city_choices(&state).await?;
    let errors = form.check(&cities);
    if !errors.is_empty() {
        return Ok(views::cafe_form_page(
            "Edit cafe",
            &format!("/cafes/{cafe_id}/edit"),
            &form,
            &cities,
            &errors,
        )
        .into_response());
    }

    let mut active: cafe::ActiveModel = existing.into();
    active.name = Set(form.name.clone());
    active.description = Set(form.description.clone());
    active.url = Set(form.url.clone());
    active.address = Set(form.address.clone());
    active.city_code = Set(form.city_code.clone());
    active.image_url = Set(form
        .image_url
        .clone()
        .unwrap_or_else(|| cafe::DEFAULT_IMAGE_URL.to_string()));
    let updated = active.update(&state.db).await?;

    info!("cafe {} edited", updated.id);
    refresh_map(&state, &updated, &cities);

    Ok(Redirect::to(&format!("/cafes/{}", updated.id)).into_response())
}

/// Kick the background map fetch for a cafe. Never blocks the request and
/// never fails it.
fn refresh_map(state: &AppState, cafe: &cafe::Model, cities: &[city::Model]) {
    if let Some(city) = cities.iter().find(|c| c.code == cafe.city_code) {
        state.maps.spawn_refresh(
            cafe.id,
            cafe.address.clone(),
            city.name.clone(),
            city.state.clone(),
        );
    }
}
