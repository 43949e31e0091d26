use anyhow::Context;
use campus_auth::create_access_token;
use campus_config::JwtConfig;
use campus_core::{AppError, hash_password, verify_password};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{LoginRequest, LoginResponse, PublicUser, RegisterRequest, User, UserRole};
use crate::metrics::{
    track_jwt_issued, track_user_login_failure, track_user_login_success, track_user_registered,
};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequest) -> Result<PublicUser, AppError> {
        let hashed_password = hash_password(&dto.password)?;
        let email = dto.email.trim().to_lowercase();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(dto.name.trim())
        .bind(&email)
        .bind(&hashed_password)
        .bind(UserRole::User)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "User with email {} already exists",
                        email
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        track_user_registered(user.role.as_str());

        Ok(user.into())
    }

    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(dto.email.trim().to_lowercase())
            .fetch_optional(db)
            .await
            .context("Failed to fetch user by email")
            .map_err(AppError::database)?;

        let Some(user) = user else {
            track_user_login_failure("unknown_email");
            return Err(AppError::unauthorized(
                "Invalid email or password".to_string(),
            ));
        };

        if !verify_password(&dto.password, &user.password)? {
            track_user_login_failure("wrong_password");
            return Err(AppError::unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        let access_token =
            create_access_token(user.id, &user.email, user.role.as_str(), jwt_config)?;

        track_jwt_issued();
        track_user_login_success(user.role.as_str());

        Ok(LoginResponse {
            access_token,
            user: user.into(),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, user_id: Uuid) -> Result<PublicUser, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch user by ID")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        Ok(user.into())
    }
}
