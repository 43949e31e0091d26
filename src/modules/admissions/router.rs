use axum::{
    Router,
    routing::{get, patch},
};

use super::controller::{
    create_admission, delete_admission, get_admission, get_admissions, update_admission_status,
};
use crate::state::AppState;

pub fn init_admissions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_admissions).post(create_admission))
        .route("/{unique_id}", get(get_admission).delete(delete_admission))
        .route("/{unique_id}/status", patch(update_admission_status))
}
