//! Photo albums.
//!
//! Deleting an album tears down everything it owns. Image host failures are
//! collected into the summary instead of aborting, so the database never
//! keeps rows pointing at an album that is half gone.

use std::collections::HashMap;

use anyhow::Context;
use campus_core::{AppError, MediaStore};
use futures_util::future::join_all;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    ALBUM_IMAGE_FOLDER, Album, AlbumDeletionSummary, AlbumImage, AlbumImageRow, AlbumRow,
    AlbumWithImages, CreateAlbumDto, HostedImage,
};
use crate::utils::upload::{UploadedFile, discard_media, store_file};

const ALBUM_SELECT: &str = r#"
    SELECT a.*, u.name AS created_by_name
    FROM albums a
    LEFT JOIN users u ON u.id = a.created_by
"#;

pub struct AlbumService;

impl AlbumService {
    #[instrument(skip(db, media, dto, cover), fields(title = %dto.title))]
    pub async fn create_album(
        db: &PgPool,
        media: &dyn MediaStore,
        created_by: Uuid,
        dto: CreateAlbumDto,
        cover: Option<UploadedFile>,
    ) -> Result<Album, AppError> {
        let stored = match &cover {
            Some(file) => Some(store_file(media, ALBUM_IMAGE_FOLDER, file).await?),
            None => None,
        };

        let result = sqlx::query_as::<_, Album>(
            r#"
            INSERT INTO albums (title, description, cover_image_url, cover_image_public_id, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(dto.title.trim())
        .bind(dto.description.as_deref().unwrap_or_default())
        .bind(stored.as_ref().map(|s| s.url.as_str()))
        .bind(stored.as_ref().map(|s| s.public_id.as_str()))
        .bind(created_by)
        .fetch_one(db)
        .await
        .context("Failed to insert album")
        .map_err(AppError::database);

        if result.is_err() {
            if let Some(stored) = &stored {
                discard_media(media, Some(&stored.public_id), &stored.url).await;
            }
        }

        result
    }

    /// Albums newest first, each with its images and the creator's name.
    #[instrument(skip(db))]
    pub async fn get_albums(db: &PgPool) -> Result<Vec<AlbumWithImages>, AppError> {
        let sql = format!("{} ORDER BY a.created_at DESC", ALBUM_SELECT);
        let albums = sqlx::query_as::<_, AlbumRow>(&sql)
            .fetch_all(db)
            .await
            .context("Failed to fetch albums")
            .map_err(AppError::database)?;

        let ids: Vec<Uuid> = albums.iter().map(|row| row.album.id).collect();
        let mut images = Self::images_for(db, &ids).await?;

        Ok(albums
            .into_iter()
            .map(|row| AlbumWithImages {
                images: images.remove(&row.album.id).unwrap_or_default(),
                album: row.album,
                created_by_name: row.created_by_name,
            })
            .collect())
    }

    #[instrument(skip(db))]
    pub async fn get_album(db: &PgPool, id: Uuid) -> Result<AlbumWithImages, AppError> {
        let sql = format!("{} WHERE a.id = $1", ALBUM_SELECT);
        let row = sqlx::query_as::<_, AlbumRow>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch album")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Album not found")))?;

        let mut images = Self::images_for(db, &[id]).await?;

        Ok(AlbumWithImages {
            images: images.remove(&id).unwrap_or_default(),
            album: row.album,
            created_by_name: row.created_by_name,
        })
    }

    async fn images_for(
        db: &PgPool,
        album_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<AlbumImage>>, AppError> {
        if album_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, AlbumImageRow>(
            r#"
            SELECT album_id, id, title, description, url, created_at
            FROM images
            WHERE album_id = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(album_ids)
        .fetch_all(db)
        .await
        .context("Failed to fetch album images")
        .map_err(AppError::database)?;

        let mut grouped: HashMap<Uuid, Vec<_>> = HashMap::new();
        for row in rows {
            grouped.entry(row.album_id).or_default().push(row.image);
        }
        Ok(grouped)
    }

    #[instrument(skip(db, media))]
    pub async fn delete_album(
        db: &PgPool,
        media: &dyn MediaStore,
        id: Uuid,
    ) -> Result<AlbumDeletionSummary, AppError> {
        let album = sqlx::query_as::<_, Album>("SELECT * FROM albums WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch album")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Album not found")))?;

        let images = sqlx::query_as::<_, HostedImage>(
            "SELECT id, url, public_id FROM images WHERE album_id = $1",
        )
        .bind(id)
        .fetch_all(db)
        .await
        .context("Failed to fetch album images")
        .map_err(AppError::database)?;

        let mut summary = AlbumDeletionSummary {
            total_images: images.len(),
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
                Some(message) => summary.host_errors.push(message),
                None => summary.images_deleted_from_host += 1,
            }
        }

        if let Some(url) = album.cover_image_url.as_deref() {
            if let Some(message) =
                discard_media(media, album.cover_image_public_id.as_deref(), url).await
            {
                summary.host_errors.push(message);
            }
        }

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        summary.images_deleted_from_db = sqlx::query("DELETE FROM images WHERE album_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete album images")
            .map_err(AppError::database)?
            .rows_affected();

        summary.album_deleted = sqlx::query("DELETE FROM albums WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete album")
            .map_err(AppError::database)?
            .rows_affected()
            > 0;

        tx.commit()
            .await
            .context("Failed to commit album deletion")
            .map_err(AppError::database)?;

        tracing::info!(
            album_id = %id,
            images = summary.total_images,
            host_errors = summary.host_errors.len(),
            "Deleted album"
        );

        Ok(summary)
    }
}
