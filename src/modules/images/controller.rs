use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use campus_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    BulkDeleteImagesDto, BulkDeleteSummary, CreateImageDto, Image, ImageDeletionSummary,
    ImageWithRelations,
};
use super::service::ImageService;
use crate::middleware::role::AdminUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::upload::UploadForm;
use crate::validator::ValidatedJson;

/// Upload an image into an album (multipart with a required `image` file)
#[utoipa::path(
    post,
    path = "/api/images",
    request_body(content = CreateImageDto, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image uploaded", body = Image),
        (status = 400, description = "Missing image or bad form", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Album not found", body = ErrorResponse),
        (status = 413, description = "Image too large", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Gallery"
)]
#[instrument(skip(state, admin, multipart))]
pub async fn create_image(
    State(state): State<AppState>,
    admin: AdminUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Image>), AppError> {
    let mut form =
        UploadForm::from_multipart(&mut multipart, state.media_config.max_upload_bytes).await?;
    let dto: CreateImageDto = form.parse()?;
    let file = form.require_file("image")?;

    let image = ImageService::create_image(
        &state.db,
        state.media.as_ref(),
        admin.0.user_id()?,
        dto,
        file,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(image)))
}

#[utoipa::path(
    get,
    path = "/api/images",
    responses(
        (status = 200, description = "Images with album title and uploader, newest first", body = Vec<ImageWithRelations>)
    ),
    tag = "Gallery"
)]
#[instrument(skip(state))]
pub async fn get_images(
    State(state): State<AppState>,
) -> Result<Json<Vec<ImageWithRelations>>, AppError> {
    let images = ImageService::get_images(&state.db).await?;
    Ok(Json(images))
}

#[utoipa::path(
    delete,
    path = "/api/images/{id}",
    params(
        ("id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Deletion summary", body = ImageDeletionSummary),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Gallery"
)]
#[instrument(skip(state, _admin))]
pub async fn delete_image(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ImageDeletionSummary>, AppError> {
    let summary = ImageService::delete_image(&state.db, state.media.as_ref(), id).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/api/images/bulk-delete",
    request_body = BulkDeleteImagesDto,
    responses(
        (status = 200, description = "Deletion summary", body = BulkDeleteSummary),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "No matching images", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Gallery"
)]
#[instrument(skip(state, _admin, dto))]
pub async fn bulk_delete_images(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(dto): ValidatedJson<BulkDeleteImagesDto>,
) -> Result<Json<BulkDeleteSummary>, AppError> {
    let summary =
        ImageService::bulk_delete_images(&state.db, state.media.as_ref(), dto.image_ids).await?;
    Ok(Json(summary))
}
