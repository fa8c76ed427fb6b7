mod dto;
pub mod handlers;
pub mod repo;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use self::handlers::{create_car, delete_car, get_car, list_cars, update_car};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cars", get(list_cars).post(create_car))
        .route("/cars/:id", get(get_car).put(update_car).delete(delete_car))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024))
}
