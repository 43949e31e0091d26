use axum::{
    Json,
    extract::{Path, Query, State},
};
use campus_core::AppError;
use campus_models::MessageResponse;
use tracing::instrument;

use super::model::{
    PaginatedStudentsResponse, PaginationParams, StudentFilterParams, StudentWithCourse,
    UpdateStudentDto,
};
use super::service::StudentService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/students",
    params(PaginationParams, StudentFilterParams),
    responses(
        (status = 200, description = "Enrolled students", body = PaginatedStudentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<StudentFilterParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let response = StudentService::get_students(&state.db, filters, pagination).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/students/{unique_id}",
    params(
        ("unique_id" = String, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student details", body = StudentWithCourse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(unique_id): Path<String>,
) -> Result<Json<StudentWithCourse>, AppError> {
    let student = StudentService::get_student(&state.db, &unique_id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    patch,
    path = "/api/students/{unique_id}",
    params(
        ("unique_id" = String, Path, description = "Student ID")
    ),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = StudentWithCourse),
        (status = 400, description = "No update data provided", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(unique_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<StudentWithCourse>, AppError> {
    let student = StudentService::update_student(&state.db, &unique_id, dto).await?;
    Ok(Json(student))
}

/// Delete a student and their fee history
#[utoipa::path(
    delete,
    path = "/api/students/{unique_id}",
    params(
        ("unique_id" = String, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(unique_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    StudentService::delete_student(&state.db, &unique_id).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}
