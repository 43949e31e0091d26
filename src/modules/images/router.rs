use axum::{
    Router,
    routing::{delete, get, post},
};

use super::controller::{bulk_delete_images, create_image, delete_image, get_images};
use crate::state::AppState;

pub fn init_images_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_images).post(create_image))
        .route("/bulk-delete", post(bulk_delete_images))
        .route("/{id}", delete(delete_image))
}
