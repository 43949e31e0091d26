use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use campus_core::AppError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

fn format_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().filter_map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .or_else(|| Some(format!("{} is invalid", field)))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run `validator` rules on a DTO that did not arrive through
/// [`ValidatedJson`], e.g. one built from multipart form fields.
pub fn validate_dto<T: Validate>(dto: &T) -> Result<(), AppError> {
    dto.validate().map_err(|errors| {
        AppError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            anyhow!("{}", format_errors(&errors)),
        )
    })
}

/// Map a serde error from decoding a request payload to a 400.
pub fn payload_error(error_msg: &str) -> AppError {
    if error_msg.contains("missing field") {
        let field = error_msg
            .split("missing field `")
            .nth(1)
            .and_then(|s| s.split('`').next())
            .unwrap_or("unknown");
        return AppError::bad_request(anyhow!("{} is required", field));
    }

    if error_msg.contains("invalid type")
        || error_msg.contains("invalid value")
        || error_msg.contains("invalid length")
        || error_msg.contains("unknown variant")
    {
        return AppError::bad_request(anyhow!("Invalid field type in request"));
    }

    AppError::bad_request(anyhow!("Invalid request body"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::bad_request(anyhow!(
                        "Missing 'Content-Type: application/json' header"
                    ));
                }

                payload_error(&rejection.body_text())
            })?;

        validate_dto(&value)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_models::{CreateCourseDto, LoginRequest};

    #[test]
    fn test_missing_field_message() {
        let err = serde_json::from_str::<LoginRequest>(r#"{"email": "a@b.co"}"#).unwrap_err();
        let app_err = payload_error(&err.to_string());
        assert_eq!(app_err.status, StatusCode::BAD_REQUEST);
        assert_eq!(app_err.error.to_string(), "password is required");
    }

    #[test]
    fn test_invalid_type_message() {
        let err = serde_json::from_str::<LoginRequest>(r#"{"email": 5, "password": "x"}"#)
            .unwrap_err();
        assert_eq!(
            payload_error(&err.to_string()).error.to_string(),
            "Invalid field type in request"
        );
    }

    #[test]
    fn test_validate_dto_is_unprocessable() {
        let dto = CreateCourseDto {
            course_name: "BCA".to_string(),
            description: "d".to_string(),
            duration: "3 years".to_string(),
            course_fee: -1.0,
            total_semesters: 6,
        };
        let err = validate_dto(&dto).unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.error.to_string().contains("course_fee"));
    }
}
