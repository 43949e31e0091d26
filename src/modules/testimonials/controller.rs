use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use campus_core::AppError;
use campus_models::MessageResponse;
use tracing::instrument;
use uuid::Uuid;

use super::model::{CreateTestimonialDto, Testimonial};
use super::service::TestimonialService;
use crate::middleware::role::AdminUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::upload::UploadForm;

/// Submit a testimonial (multipart with an optional `image` file)
#[utoipa::path(
    post,
    path = "/api/testimonials",
    request_body(content = CreateTestimonialDto, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Testimonial created", body = Testimonial),
        (status = 400, description = "Bad form", body = ErrorResponse),
        (status = 409, description = "Email already used", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Testimonials"
)]
#[instrument(skip(state, multipart))]
pub async fn create_testimonial(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Testimonial>), AppError> {
    let mut form =
        UploadForm::from_multipart(&mut multipart, state.media_config.max_upload_bytes).await?;
    let dto: CreateTestimonialDto = form.parse()?;
    let image = form.take_file("image");

    let testimonial =
        TestimonialService::create_testimonial(&state.db, state.media.as_ref(), dto, image).await?;
    Ok((StatusCode::CREATED, Json(testimonial)))
}

#[utoipa::path(
    get,
    path = "/api/testimonials",
    responses(
        (status = 200, description = "Testimonials, newest first", body = Vec<Testimonial>)
    ),
    tag = "Testimonials"
)]
#[instrument(skip(state))]
pub async fn get_testimonials(
    State(state): State<AppState>,
) -> Result<Json<Vec<Testimonial>>, AppError> {
    let testimonials = TestimonialService::get_testimonials(&state.db).await?;
    Ok(Json(testimonials))
}

#[utoipa::path(
    delete,
    path = "/api/testimonials/{id}",
    params(
        ("id" = Uuid, Path, description = "Testimonial ID")
    ),
    responses(
        (status = 200, description = "Testimonial deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Testimonial not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Testimonials"
)]
#[instrument(skip(state, _admin))]
pub async fn delete_testimonial(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let warning =
        TestimonialService::delete_testimonial(&state.db, state.media.as_ref(), id).await?;

    let message = match warning {
        Some(warning) => format!("Testimonial deleted. {}", warning),
        None => "Testimonial deleted successfully".to_string(),
    };
    Ok(Json(MessageResponse::new(message)))
}
