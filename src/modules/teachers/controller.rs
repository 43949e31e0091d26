use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use campus_core::AppError;
use campus_models::MessageResponse;
use tracing::instrument;
use uuid::Uuid;

use super::model::{CreateTeacherDto, Teacher, UpdateTeacherDto};
use super::service::TeacherService;
use crate::middleware::role::AdminUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::upload::UploadForm;

/// Create a teacher profile (multipart with a required `image` file)
#[utoipa::path(
    post,
    path = "/api/teachers",
    request_body(content = CreateTeacherDto, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Teacher created", body = Teacher),
        (status = 400, description = "Missing image or bad form", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 413, description = "Image too large", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip(state, _admin, multipart))]
pub async fn create_teacher(
    State(state): State<AppState>,
    _admin: AdminUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Teacher>), AppError> {
    let mut form =
        UploadForm::from_multipart(&mut multipart, state.media_config.max_upload_bytes).await?;
    let dto: CreateTeacherDto = form.parse()?;
    let image = form.require_file("image")?;

    let teacher = TeacherService::create_teacher(&state.db, state.media.as_ref(), dto, image).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

#[utoipa::path(
    get,
    path = "/api/teachers",
    responses(
        (status = 200, description = "All teachers, newest first", body = Vec<Teacher>)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teachers(State(state): State<AppState>) -> Result<Json<Vec<Teacher>>, AppError> {
    let teachers = TeacherService::get_teachers(&state.db).await?;
    Ok(Json(teachers))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Teacher details", body = Teacher),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teacher(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Teacher>, AppError> {
    let teacher = TeacherService::get_teacher_by_id(&state.db, id).await?;
    Ok(Json(teacher))
}

/// Update a teacher profile (multipart, every field optional)
#[utoipa::path(
    patch,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    request_body(content = UpdateTeacherDto, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Teacher updated", body = Teacher),
        (status = 400, description = "No update data provided", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip(state, _admin, multipart))]
pub async fn update_teacher(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Teacher>, AppError> {
    let mut form =
        UploadForm::from_multipart(&mut multipart, state.media_config.max_upload_bytes).await?;
    let dto: UpdateTeacherDto = form.parse()?;
    let image = form.take_file("image");

    let teacher =
        TeacherService::update_teacher(&state.db, state.media.as_ref(), id, dto, image).await?;
    Ok(Json(teacher))
}

#[utoipa::path(
    delete,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Teacher deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip(state, _admin))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let warning = TeacherService::delete_teacher(&state.db, state.media.as_ref(), id).await?;

    let message = match warning {
        Some(warning) => format!("Teacher deleted. {}", warning),
        None => "Teacher deleted successfully".to_string(),
    };
    Ok(Json(MessageResponse::new(message)))
}
