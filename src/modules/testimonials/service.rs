use anyhow::Context;
use campus_core::{AppError, MediaStore};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    CreateTestimonialDto, DEFAULT_AVATAR_URL, TESTIMONIAL_IMAGE_FOLDER, Testimonial,
};
use crate::utils::upload::{UploadedFile, discard_media, store_file};

pub struct TestimonialService;

impl TestimonialService {
    /// One testimonial per email. Without an image the default avatar is used.
    #[instrument(skip(db, media, dto, image), fields(email = %dto.email))]
    pub async fn create_testimonial(
        db: &PgPool,
        media: &dyn MediaStore,
        dto: CreateTestimonialDto,
        image: Option<UploadedFile>,
    ) -> Result<Testimonial, AppError> {
        let email = dto.email.trim().to_lowercase();

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM testimonials WHERE email = $1)")
                .bind(&email)
                .fetch_one(db)
                .await
                .context("Failed to check testimonial email")
                .map_err(AppError::database)?;

        if exists {
            return Err(AppError::conflict(anyhow::anyhow!(
                "A testimonial from {} already exists",
                email
            )));
        }

        let stored = match &image {
            Some(file) => Some(store_file(media, TESTIMONIAL_IMAGE_FOLDER, file).await?),
            None => None,
        };

        let result = sqlx::query_as::<_, Testimonial>(
            r#"
            INSERT INTO testimonials (name, email, image_url, image_public_id, message, job_role, star)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(dto.name.trim())
        .bind(&email)
        .bind(stored.as_ref().map_or(DEFAULT_AVATAR_URL, |s| s.url.as_str()))
        .bind(stored.as_ref().map(|s| s.public_id.as_str()))
        .bind(dto.message.trim())
        .bind(dto.job_role.trim())
        .bind(dto.star)
        .fetch_one(db)
        .await;

        match result {
            Ok(testimonial) => Ok(testimonial),
            Err(e) => {
                if let Some(stored) = &stored {
                    discard_media(media, Some(&stored.public_id), &stored.url).await;
                }

                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return Err(AppError::conflict(anyhow::anyhow!(
                            "A testimonial from {} already exists",
                            email
                        )));
                    }
                }

                Err(AppError::database(
                    anyhow::Error::from(e).context("Failed to insert testimonial"),
                ))
            }
        }
    }

    #[instrument(skip(db))]
    pub async fn get_testimonials(db: &PgPool) -> Result<Vec<Testimonial>, AppError> {
        sqlx::query_as::<_, Testimonial>("SELECT * FROM testimonials ORDER BY created_at DESC")
            .fetch_all(db)
            .await
            .context("Failed to fetch testimonials")
            .map_err(AppError::database)
    }

    /// Returns a warning when the hosted image could not be removed.
    #[instrument(skip(db, media))]
    pub async fn delete_testimonial(
        db: &PgPool,
        media: &dyn MediaStore,
        id: Uuid,
    ) -> Result<Option<String>, AppError> {
        let testimonial =
            sqlx::query_as::<_, Testimonial>("DELETE FROM testimonials WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(db)
                .await
                .context("Failed to delete testimonial")
                .map_err(AppError::database)?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Testimonial not found")))?;

        match testimonial.image_public_id.as_deref() {
            Some(public_id) => {
                Ok(discard_media(media, Some(public_id), &testimonial.image_url).await)
            }
            // Default avatar, nothing hosted.
            None => Ok(None),
        }
    }
}
