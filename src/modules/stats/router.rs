use axum::{Router, middleware, routing::get};

use super::controller::get_dashboard_stats;
use crate::middleware::role::require_admin;
use crate::state::AppState;

pub fn init_stats_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_dashboard_stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
}
