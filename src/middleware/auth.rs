use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use campus_auth::jwt::AUTH_COOKIE;
use campus_auth::{Claims, extract_token, verify_token};
use campus_core::AppError;
use uuid::Uuid;

use crate::state::AppState;

/// Extractor that validates the JWT and provides the caller's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let token = extract_token(authorization, jar.get(AUTH_COOKIE).map(|c| c.value()))
            .ok_or_else(|| AppError::unauthorized("Authentication required".to_string()))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            email: "admin@example.com".to_string(),
            role: "admin".to_string(),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_user_id() {
        let user_id = Uuid::new_v4();
        let auth_user = AuthUser(claims(&user_id.to_string()));

        assert_eq!(auth_user.user_id().unwrap(), user_id);
        assert_eq!(auth_user.email(), "admin@example.com");
    }

    #[test]
    fn test_user_id_rejects_garbage_subject() {
        let err = AuthUser(claims("not-a-uuid")).user_id().unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }
}
