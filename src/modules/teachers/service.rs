use anyhow::Context;
use campus_core::{AppError, MediaStore, StoredMedia};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{CreateTeacherDto, TEACHER_IMAGE_FOLDER, Teacher, UpdateTeacherDto};
use crate::utils::upload::{UploadedFile, discard_media, store_file};

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db, media, dto, image), fields(email = %dto.email))]
    pub async fn create_teacher(
        db: &PgPool,
        media: &dyn MediaStore,
        dto: CreateTeacherDto,
        image: UploadedFile,
    ) -> Result<Teacher, AppError> {
        let stored = store_file(media, TEACHER_IMAGE_FOLDER, &image).await?;

        let result = sqlx::query_as::<_, Teacher>(
            r#"
            INSERT INTO teachers (name, email, image_url, image_public_id, role, specialization,
                                  experience, facebook, linkedin, twitter, instagram)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&stored.url)
        .bind(&stored.public_id)
        .bind(&dto.role)
        .bind(&dto.specialization)
        .bind(&dto.experience)
        .bind(&dto.facebook)
        .bind(&dto.linkedin)
        .bind(&dto.twitter)
        .bind(&dto.instagram)
        .fetch_one(db)
        .await
        .context("Failed to insert teacher")
        .map_err(AppError::database);

        if result.is_err() {
            discard_media(media, Some(&stored.public_id), &stored.url).await;
        }

        result
    }

    #[instrument(skip(db))]
    pub async fn get_teachers(db: &PgPool) -> Result<Vec<Teacher>, AppError> {
        sqlx::query_as::<_, Teacher>("SELECT * FROM teachers ORDER BY created_at DESC")
            .fetch_all(db)
            .await
            .context("Failed to fetch teachers")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_teacher_by_id(db: &PgPool, id: Uuid) -> Result<Teacher, AppError> {
        sqlx::query_as::<_, Teacher>("SELECT * FROM teachers WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch teacher by ID")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))
    }

    /// Partial update. A new image replaces the old one, which is then
    /// removed from the media host.
    #[instrument(skip(db, media, dto, image))]
    pub async fn update_teacher(
        db: &PgPool,
        media: &dyn MediaStore,
        id: Uuid,
        dto: UpdateTeacherDto,
        image: Option<UploadedFile>,
    ) -> Result<Teacher, AppError> {
        if dto.is_empty() && image.is_none() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "No update data provided"
            )));
        }

        let existing = Self::get_teacher_by_id(db, id).await?;

        let stored: Option<StoredMedia> = match &image {
            Some(file) => Some(store_file(media, TEACHER_IMAGE_FOLDER, file).await?),
            None => None,
        };

        let result = sqlx::query_as::<_, Teacher>(
            r#"
            UPDATE teachers
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                role = COALESCE($4, role),
                specialization = COALESCE($5, specialization),
                experience = COALESCE($6, experience),
                facebook = COALESCE($7, facebook),
                linkedin = COALESCE($8, linkedin),
                twitter = COALESCE($9, twitter),
                instagram = COALESCE($10, instagram),
                image_url = COALESCE($11, image_url),
                image_public_id = COALESCE($12, image_public_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&dto.role)
        .bind(&dto.specialization)
        .bind(&dto.experience)
        .bind(&dto.facebook)
        .bind(&dto.linkedin)
        .bind(&dto.twitter)
        .bind(&dto.instagram)
        .bind(stored.as_ref().map(|s| s.url.as_str()))
        .bind(stored.as_ref().map(|s| s.public_id.as_str()))
        .fetch_optional(db)
        .await
        .context("Failed to update teacher")
        .map_err(AppError::database)
        .and_then(|row| {
            row.ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))
        });

        match (&result, &stored) {
            (Ok(_), Some(_)) => {
                discard_media(
                    media,
                    existing.image_public_id.as_deref(),
                    &existing.image_url,
                )
                .await;
            }
            (Err(_), Some(new_image)) => {
                discard_media(media, Some(&new_image.public_id), &new_image.url).await;
            }
            _ => {}
        }

        result
    }

    #[instrument(skip(db, media))]
    pub async fn delete_teacher(
        db: &PgPool,
        media: &dyn MediaStore,
        id: Uuid,
    ) -> Result<Option<String>, AppError> {
        let teacher = sqlx::query_as::<_, Teacher>("DELETE FROM teachers WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to delete teacher")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;

        Ok(discard_media(media, teacher.image_public_id.as_deref(), &teacher.image_url).await)
    }

    #[instrument(skip(db))]
    pub async fn count_teachers(db: &PgPool) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM teachers")
            .fetch_one(db)
            .await
            .context("Failed to count teachers")
            .map_err(AppError::database)
    }
}
