use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use campus_core::AppError;
use campus_models::MessageResponse;
use tracing::instrument;

use super::model::{
    AdmissionFilterParams, CreateAdmissionDto, PaginatedStudentsResponse, PaginationParams,
    Student, StudentWithCourse, UpdateAdmissionStatusDto,
};
use super::service::AdmissionService;
use crate::middleware::role::AdminUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Apply for admission to a course
#[utoipa::path(
    post,
    path = "/api/admissions",
    request_body = CreateAdmissionDto,
    responses(
        (status = 201, description = "Application received", body = Student),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 409, description = "Already applied for this course", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Admissions"
)]
#[instrument(skip(state, dto))]
pub async fn create_admission(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateAdmissionDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = AdmissionService::create_admission(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    get,
    path = "/api/admissions",
    params(PaginationParams, AdmissionFilterParams),
    responses(
        (status = 200, description = "Applications, newest first", body = PaginatedStudentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admissions"
)]
#[instrument(skip(state, _admin))]
pub async fn get_admissions(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<AdmissionFilterParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let response = AdmissionService::get_admissions(&state.db, filters, pagination).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/admissions/{unique_id}",
    params(
        ("unique_id" = String, Path, description = "Student ID, e.g. STU2025123456")
    ),
    responses(
        (status = 200, description = "Application details", body = StudentWithCourse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Admission not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admissions"
)]
#[instrument(skip(state, _admin))]
pub async fn get_admission(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(unique_id): Path<String>,
) -> Result<Json<StudentWithCourse>, AppError> {
    let admission = AdmissionService::get_admission(&state.db, &unique_id).await?;
    Ok(Json(admission))
}

/// Accept or reject a pending application
///
/// Accepting creates the student's login account and mails the
/// credentials.
#[utoipa::path(
    patch,
    path = "/api/admissions/{unique_id}/status",
    params(
        ("unique_id" = String, Path, description = "Student ID")
    ),
    request_body = UpdateAdmissionStatusDto,
    responses(
        (status = 200, description = "Status updated", body = StudentWithCourse),
        (status = 400, description = "Invalid target status", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Admission not found", body = ErrorResponse),
        (status = 409, description = "Admission already decided", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admissions"
)]
#[instrument(skip(state, _admin, dto))]
pub async fn update_admission_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(unique_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateAdmissionStatusDto>,
) -> Result<Json<StudentWithCourse>, AppError> {
    let admission =
        AdmissionService::update_status(&state.db, &state.email_config, &unique_id, dto.status)
            .await?;
    Ok(Json(admission))
}

#[utoipa::path(
    delete,
    path = "/api/admissions/{unique_id}",
    params(
        ("unique_id" = String, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Admission deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Admission not found", body = ErrorResponse),
        (status = 409, description = "Admission has fee records", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admissions"
)]
#[instrument(skip(state, _admin))]
pub async fn delete_admission(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(unique_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    AdmissionService::delete_admission(&state.db, &unique_id).await?;
    Ok(Json(MessageResponse::new("Admission deleted successfully")))
}
