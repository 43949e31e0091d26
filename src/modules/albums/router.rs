use axum::{Router, routing::get};

use super::controller::{create_album, delete_album, get_album, get_albums};
use crate::state::AppState;

pub fn init_albums_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_albums).post(create_album))
        .route("/{id}", get(get_album).delete(delete_album))
}
