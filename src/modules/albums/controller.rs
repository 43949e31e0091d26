use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use campus_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use super::model::{Album, AlbumDeletionSummary, AlbumWithImages, CreateAlbumDto};
use super::service::AlbumService;
use crate::middleware::role::AdminUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::upload::UploadForm;

/// Create an album (multipart with an optional `cover_image` file)
#[utoipa::path(
    post,
    path = "/api/albums",
    request_body(content = CreateAlbumDto, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Album created", body = Album),
        (status = 400, description = "Bad form", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Gallery"
)]
#[instrument(skip(state, admin, multipart))]
pub async fn create_album(
    State(state): State<AppState>,
    admin: AdminUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Album>), AppError> {
    let mut form =
        UploadForm::from_multipart(&mut multipart, state.media_config.max_upload_bytes).await?;
    let dto: CreateAlbumDto = form.parse()?;
    let cover = form.take_file("cover_image");

    let album = AlbumService::create_album(
        &state.db,
        state.media.as_ref(),
        admin.0.user_id()?,
        dto,
        cover,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(album)))
}

#[utoipa::path(
    get,
    path = "/api/albums",
    responses(
        (status = 200, description = "Albums with their images, newest first", body = Vec<AlbumWithImages>)
    ),
    tag = "Gallery"
)]
#[instrument(skip(state))]
pub async fn get_albums(
    State(state): State<AppState>,
) -> Result<Json<Vec<AlbumWithImages>>, AppError> {
    let albums = AlbumService::get_albums(&state.db).await?;
    Ok(Json(albums))
}

#[utoipa::path(
    get,
    path = "/api/albums/{id}",
    params(
        ("id" = Uuid, Path, description = "Album ID")
    ),
    responses(
        (status = 200, description = "Album with its images", body = AlbumWithImages),
        (status = 404, description = "Album not found", body = ErrorResponse)
    ),
    tag = "Gallery"
)]
#[instrument(skip(state))]
pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AlbumWithImages>, AppError> {
    let album = AlbumService::get_album(&state.db, id).await?;
    Ok(Json(album))
}

/// Delete an album with all of its images
///
/// Image host failures are reported in `host_errors` and do not stop the
/// deletion.
#[utoipa::path(
    delete,
    path = "/api/albums/{id}",
    params(
        ("id" = Uuid, Path, description = "Album ID")
    ),
    responses(
        (status = 200, description = "Deletion summary", body = AlbumDeletionSummary),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Album not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Gallery"
)]
#[instrument(skip(state, _admin))]
pub async fn delete_album(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AlbumDeletionSummary>, AppError> {
    let summary = AlbumService::delete_album(&state.db, state.media.as_ref(), id).await?;
    Ok(Json(summary))
}
