//! Admin authorization.
//!
//! The role in the token is not trusted on its own: the account is looked up
//! by email on every admin request, so a demoted or deleted account loses
//! access immediately.

use anyhow::Context;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use campus_core::AppError;
use campus_models::UserRole;
use sqlx::PgPool;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Checks that the account behind `auth_user` still exists and is an admin.
pub async fn ensure_admin(db: &PgPool, auth_user: &AuthUser) -> Result<(), AppError> {
    let role = sqlx::query_scalar::<_, UserRole>("SELECT role FROM users WHERE email = $1")
        .bind(auth_user.email())
        .fetch_optional(db)
        .await
        .context("Failed to load user role")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::unauthorized("User not found".to_string()))?;

    if role != UserRole::Admin {
        return Err(AppError::forbidden(
            "Access denied. Administrator privileges required.".to_string(),
        ));
    }

    Ok(())
}

/// Route middleware for routers where every endpoint is admin-only.
///
/// ```rust,ignore
/// Router::new()
///     .nest("/stats", init_stats_router())
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let result = async {
        let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
        ensure_admin(&state.db, &auth_user).await?;
        Ok::<_, AppError>(auth_user)
    }
    .await;

    match result {
        Ok(auth_user) => {
            parts.extensions.insert(auth_user);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(err) => err.into_response(),
    }
}

/// Extractor for admin-only handlers on routers that also serve public
/// endpoints.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth_user) = parts.extensions.get::<AuthUser>() {
            return Ok(AdminUser(auth_user.clone()));
        }

        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        ensure_admin(&state.db, &auth_user).await?;

        Ok(AdminUser(auth_user))
    }
}
