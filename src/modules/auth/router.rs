use axum::{
    Router,
    routing::{get, post},
};
use tower_governor::GovernorLayer;

use super::controller::{get_current_user, login_user, logout_user, register_user};
use crate::state::AppState;

pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    let credentials = Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user));

    let credentials = match state
        .rate_limit_config
        .enabled
        .then(|| state.rate_limit_config.auth_governor_config())
        .flatten()
    {
        Some(config) => credentials.layer(GovernorLayer::new(config)),
        None => credentials,
    };

    Router::new()
        .merge(credentials)
        .route("/logout", post(logout_user))
        .route("/me", get(get_current_user))
}
