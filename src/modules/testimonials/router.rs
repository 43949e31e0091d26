use axum::{
    Router,
    routing::{delete, get},
};

use super::controller::{create_testimonial, delete_testimonial, get_testimonials};
use crate::state::AppState;

pub fn init_testimonials_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_testimonials).post(create_testimonial))
        .route("/{id}", delete(delete_testimonial))
}
