use anyhow::Context;
use campus_core::{AppError, MediaStore};
use futures_util::future::join_all;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    ALBUM_IMAGE_FOLDER, BulkDeleteSummary, CreateImageDto, Image, ImageDeletionSummary,
    ImageWithRelations, missing_ids,
};
use crate::utils::upload::{UploadedFile, discard_media, store_file};

pub struct ImageService;

impl ImageService {
    #[instrument(skip(db, media, dto, file), fields(album_id = %dto.album_id))]
    pub async fn create_image(
        db: &PgPool,
        media: &dyn MediaStore,
        uploaded_by: Uuid,
        dto: CreateImageDto,
        file: UploadedFile,
    ) -> Result<Image, AppError> {
        let album_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM albums WHERE id = $1)")
                .bind(dto.album_id)
                .fetch_one(db)
                .await
                .context("Failed to check album")
                .map_err(AppError::database)?;

        if !album_exists {
            return Err(AppError::not_found(anyhow::anyhow!("Album not found")));
        }

        let stored = store_file(media, ALBUM_IMAGE_FOLDER, &file).await?;

        let result = sqlx::query_as::<_, Image>(
            r#"
            INSERT INTO images (title, description, url, public_id, album_id, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(&stored.url)
        .bind(&stored.public_id)
        .bind(dto.album_id)
        .bind(uploaded_by)
        .fetch_one(db)
        .await
        .context("Failed to insert image")
        .map_err(AppError::database);

        if result.is_err() {
            discard_media(media, Some(&stored.public_id), &stored.url).await;
        }

        result
    }

    #[instrument(skip(db))]
    pub async fn get_images(db: &PgPool) -> Result<Vec<ImageWithRelations>, AppError> {
        sqlx::query_as::<_, ImageWithRelations>(
            r#"
            SELECT i.*, a.title AS album_title, u.name AS uploaded_by_name
            FROM images i
            LEFT JOIN albums a ON a.id = i.album_id
            LEFT JOIN users u ON u.id = i.uploaded_by
            ORDER BY i.created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch images")
        .map_err(AppError::database)
    }

    /// Host failures become a warning; a database failure is an error.
    #[instrument(skip(db, media))]
    pub async fn delete_image(
        db: &PgPool,
        media: &dyn MediaStore,
        id: Uuid,
    ) -> Result<ImageDeletionSummary, AppError> {
        let image = sqlx::query_as::<_, Image>("SELECT * FROM images WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch image")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Image not found")))?;

        let warning = discard_media(media, Some(&image.public_id), &image.url).await;

        let deleted = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete image")
            .map_err(AppError::database)?
            .rows_affected();

        Ok(ImageDeletionSummary {
            image_id: id,
            deleted_from_db: deleted > 0,
            deleted_from_host: warning.is_none(),
            warning,
        })
    }

    /// Delete several images. Host deletions run concurrently.
    #[instrument(skip(db, media, image_ids), fields(requested = image_ids.len()))]
    pub async fn bulk_delete_images(
        db: &PgPool,
        media: &dyn MediaStore,
        image_ids: Vec<Uuid>,
    ) -> Result<BulkDeleteSummary, AppError> {
        let images = sqlx::query_as::<_, Image>("SELECT * FROM images WHERE id = ANY($1)")
            .bind(&image_ids)
            .fetch_all(db)
            .await
            .context("Failed to fetch images")
            .map_err(AppError::database)?;

        if images.is_empty() {
            return Err(AppError::not_found(anyhow::anyhow!(
                "None of the requested images exist"
            )));
        }

        let found: Vec<Uuid> = images.iter().map(|image| image.id).collect();
        let mut summary = BulkDeleteSummary {
            requested: image_ids.len(),
            found: images.len(),
            not_found: missing_ids(&image_ids, &found),
            ..Default::default()
        };

        let warnings = join_all(
            images
                .iter()
                .map(|image| discard_media(media, Some(&image.public_id), &image.url)),
        )
        .await;
        for warning in warnings {
            match warning {
                Some(message) => summary.errors.push(message),
                None => summary.deleted_from_host += 1,
            }
        }

        summary.deleted_from_db = sqlx::query("DELETE FROM images WHERE id = ANY($1)")
            .bind(&found)
            .execute(db)
            .await
            .context("Failed to delete images")
            .map_err(AppError::database)?
            .rows_affected();

        Ok(summary)
    }
}
