use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::extractors::AuthUser, error::ApiError, state::AppState};

use super::dto::{CarPatch, CreatedCar};
use super::repo::{self, Car, NewCar};

const MAX_IMAGES: usize = 10;

/// What a multipart car request carries: text fields plus raw uploads that
/// have not been written to storage yet.
#[derive(Default)]
struct CarForm {
    title: Option<String>,
    description: Option<String>,
    tags: Option<Vec<String>>,
    uploads: Vec<(String, Bytes)>,
}

async fn read_car_form(mut mp: Multipart) -> Result<CarForm, ApiError> {
    let mut form = CarForm::default();
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("title") => form.title = Some(field.text().await.map_err(bad_field)?),
            Some("description") => form.description = Some(field.text().await.map_err(bad_field)?),
            Some("tags") => {
                // Repeated field, one tag per occurrence.
                let tag = field.text().await.map_err(bad_field)?;
                form.tags.get_or_insert_with(Vec::new).push(tag);
            }
            Some("images") | Some("images[]") => {
                let original = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "upload".into());
                let data = field.bytes().await.map_err(bad_field)?;
                form.uploads.push((original, data));
            }
            _ => {}
        }
    }
    if form.uploads.len() > MAX_IMAGES {
        return Err(ApiError::BadRequest(format!(
            "at most {MAX_IMAGES} images per car"
        )));
    }
    Ok(form)
}

fn bad_field(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(format!("invalid multipart field: {e}"))
}

async fn store_uploads(
    state: &AppState,
    uploads: Vec<(String, Bytes)>,
) -> Result<Vec<String>, ApiError> {
    let mut names = Vec::with_capacity(uploads.len());
    for (original, body) in uploads {
        names.push(state.storage.store(&original, body).await?);
    }
    Ok(names)
}

#[instrument(skip(state, mp))]
pub async fn create_car(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mp: Multipart,
) -> Result<(StatusCode, Json<CreatedCar>), ApiError> {
    let form = read_car_form(mp).await?;
    let images = store_uploads(&state, form.uploads).await?;

    let car = repo::create(
        &state.db,
        user_id,
        NewCar {
            title: form.title,
            description: form.description,
            tags: form.tags.unwrap_or_default(),
            images,
        },
    )
    .await?;

    info!(user_id = %user_id, car_id = %car.id, images = car.images.len(), "car created");
    Ok((StatusCode::CREATED, Json(CreatedCar { car })))
}

#[instrument(skip(state))]
pub async fn list_cars(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Car>>, ApiError> {
    let cars = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(cars))
}

#[instrument(skip(state))]
pub async fn get_car(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Car>, ApiError> {
    let car = repo::find_owned(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("Car not found"))?;
    Ok(Json(car))
}

#[instrument(skip(state, mp))]
pub async fn update_car(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    mp: Multipart,
) -> Result<Json<Car>, ApiError> {
    let mut car = repo::find_owned(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("Car not found"))?;

    let form = read_car_form(mp).await?;
    let images = store_uploads(&state, form.uploads).await?;

    CarPatch {
        title: form.title,
        description: form.description,
        tags: form.tags,
        images: Some(images),
    }
    .apply(&mut car);

    let car = repo::save(&state.db, &car).await?;
    info!(user_id = %user_id, car_id = %car.id, "car updated");
    Ok(Json(car))
}

#[instrument(skip(state))]
pub async fn delete_car(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<&'static str, ApiError> {
    if !repo::delete_owned(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Car not found"));
    }
    info!(user_id = %user_id, car_id = %id, "car deleted");
    Ok("Car deleted")
}
