pub use campus_models::albums::{
    Album, AlbumDeletionSummary, AlbumImage, AlbumWithImages, CreateAlbumDto,
};

use sqlx::FromRow;
use uuid::Uuid;

/// Media host folder for album covers and gallery images.
pub const ALBUM_IMAGE_FOLDER: &str = "albums";

#[derive(Debug, FromRow)]
pub(crate) struct AlbumRow {
    #[sqlx(flatten)]
    pub album: Album,
    pub created_by_name: Option<String>,
}

#[derive(Debug, FromRow)]
pub(crate) struct AlbumImageRow {
    pub album_id: Uuid,
    #[sqlx(flatten)]
    pub image: AlbumImage,
}

#[derive(Debug, FromRow)]
pub(crate) struct HostedImage {
    pub id: Uuid,
    pub url: String,
    pub public_id: String,
}
