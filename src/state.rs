use std::sync::Arc;

use campus_config::{
    CorsConfig, EmailConfig, JwtConfig, MediaBackend, MediaConfig, PaymentConfig, RateLimitConfig,
};
use campus_core::{LocalMediaStore, MediaStore};
use campus_db::init_db_pool;
use sqlx::PgPool;

use crate::integrations::{CashfreeGateway, CloudinaryStore, PaymentGateway};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub payment_config: PaymentConfig,
    pub media_config: MediaConfig,
    pub media: Arc<dyn MediaStore>,
    pub payments: Arc<dyn PaymentGateway>,
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = init_db_pool().await?;
    let http_client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let media_config = MediaConfig::from_env();
    let payment_config = PaymentConfig::from_env();

    Ok(AppState {
        db,
        jwt_config: JwtConfig::from_env(),
        email_config: EmailConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
        media: build_media_store(&media_config, http_client.clone()),
        payments: Arc::new(CashfreeGateway::new(http_client, payment_config.clone())),
        payment_config,
        media_config,
    })
}

pub fn build_media_store(config: &MediaConfig, http_client: reqwest::Client) -> Arc<dyn MediaStore> {
    match config.backend {
        MediaBackend::Cloudinary => {
            tracing::info!(cloud = %config.cloudinary_cloud_name, "Using Cloudinary media backend");
            Arc::new(CloudinaryStore::new(
                http_client,
                config.cloudinary_cloud_name.clone(),
                config.cloudinary_api_key.clone(),
                config.cloudinary_api_secret.clone(),
                config.max_upload_bytes,
            ))
        }
        MediaBackend::Local => {
            tracing::info!(dir = %config.upload_dir.display(), "Using local media backend");
            Arc::new(LocalMediaStore::with_max_size(
                config.upload_dir.clone(),
                config.upload_base_url.clone(),
                config.max_upload_bytes,
            ))
        }
    }
}
