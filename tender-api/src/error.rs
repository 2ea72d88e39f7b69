/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`, which converts to the matching
/// status code and a JSON body:
///
/// ```json
/// { "error": "not_found", "message": "Transaction not found" }
/// ```
///
/// # Example
///
/// ```ignore
/// use tender_api::error::{ApiError, ApiResult};
/// use axum::Json;
///
/// async fn handler(pool: &MySqlPool, id: i64) -> ApiResult<Json<Company>> {
///     let company = Company::find_by_id(pool, id)
///         .await?
///         .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;
///     Ok(Json(company))
/// }
/// ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tender_shared::{
    auth::password::PasswordError, mail::MailError, models::user::UserError, push::PushError,
};
use validator::ValidationErrors;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// MySQL error code for duplicate unique keys
const ER_DUP_ENTRY: &str = "1062";

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - e.g., duplicate email
    Conflict(String),

    /// Unsupported media type (415) - body sent without a JSON content type
    UnsupportedMediaType(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),

    /// Service unavailable (503)
    ServiceUnavailable(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "not_found")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// 404 with a "<what> not found" message
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found", what))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::UnsupportedMediaType(msg) => write!(f, "Unsupported media type: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_media_type",
                msg,
                None,
            ),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
                None,
            ),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.code().as_deref() == Some(ER_DUP_ENTRY) || db_err.is_unique_violation() {
                    return ApiError::Conflict(format!("Duplicate entry: {}", db_err.message()));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            sqlx::Error::PoolTimedOut => {
                ApiError::ServiceUnavailable("Database is busy, try again later".to_string())
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Malformed path segments, e.g. a non-numeric id
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Missing or malformed query parameters
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Body rejections keep axum's status: 415 without a JSON content type,
/// 422 when well-formed JSON doesn't fit the target type, 400 otherwise
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::UnsupportedMediaType(rejection.body_text())
            }
            JsonRejection::JsonDataError(_) => ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "body".to_string(),
                message: rejection.body_text(),
            }]),
            _ => ApiError::BadRequest(rejection.body_text()),
        }
    }
}

/// Convert account errors to API errors
impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DuplicateEmail | UserError::DuplicatePhone => {
                ApiError::Conflict(err.to_string())
            }
            UserError::NotFound => ApiError::not_found("User"),
            UserError::InvalidPassword => ApiError::Unauthorized("Invalid password".to_string()),
            UserError::Password(err) => err.into(),
            UserError::Database(err) => err.into(),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert push errors to API errors
impl From<PushError> for ApiError {
    fn from(err: PushError) -> Self {
        match err {
            PushError::Http(_) | PushError::Rejected { .. } => {
                ApiError::ServiceUnavailable(format!("Push delivery failed: {}", err))
            }
            _ => ApiError::InternalError(format!("Push error: {}", err)),
        }
    }
}

/// Convert mail errors to API errors
impl From<MailError> for ApiError {
    fn from(err: MailError) -> Self {
        match err {
            MailError::Address(_) => ApiError::BadRequest(format!("Invalid email address: {}", err)),
            MailError::Smtp(_) => {
                ApiError::ServiceUnavailable("Email delivery is temporarily unavailable".to_string())
            }
            MailError::Build(_) => ApiError::InternalError(format!("Mail error: {}", err)),
        }
    }
}

/// Convert validator derive failures to a 422 with per-field details
impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        let mut errors: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::ValidationError(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::not_found("Tender");
        assert_eq!(err.to_string(), "Not found: Tender not found");
    }

    #[test]
    fn test_validation_error() {
        let errors = vec![
            ValidationErrorDetail {
                field: "email".to_string(),
                message: "Invalid email format".to_string(),
            },
            ValidationErrorDetail {
                field: "name".to_string(),
                message: "Name is required".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::BadRequest(String::new()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized(String::new()), StatusCode::UNAUTHORIZED),
            (ApiError::NotFound(String::new()), StatusCode::NOT_FOUND),
            (ApiError::Conflict(String::new()), StatusCode::CONFLICT),
            (
                ApiError::UnsupportedMediaType(String::new()),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (ApiError::ValidationError(vec![]), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::InternalError(String::new()), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::ServiceUnavailable(String::new()), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_user_error_mapping() {
        assert!(matches!(ApiError::from(UserError::DuplicateEmail), ApiError::Conflict(_)));
        assert!(matches!(ApiError::from(UserError::DuplicatePhone), ApiError::Conflict(_)));
        assert!(matches!(ApiError::from(UserError::NotFound), ApiError::NotFound(_)));
        assert!(matches!(
            ApiError::from(UserError::InvalidPassword),
            ApiError::Unauthorized(_)
        ));
    }

    #[test]
    fn test_sqlx_error_mapping() {
        assert!(matches!(ApiError::from(sqlx::Error::RowNotFound), ApiError::NotFound(_)));
        assert!(matches!(
            ApiError::from(sqlx::Error::PoolTimedOut),
            ApiError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            ApiError::from(sqlx::Error::Protocol("boom".to_string())),
            ApiError::InternalError(_)
        ));
    }

    #[test]
    fn test_push_error_mapping() {
        let err = PushError::Rejected {
            status: 404,
            body: "UNREGISTERED".to_string(),
        };
        assert!(matches!(ApiError::from(err), ApiError::ServiceUnavailable(_)));
        assert!(matches!(
            ApiError::from(PushError::Credentials("missing".to_string())),
            ApiError::InternalError(_)
        ));
    }

    #[derive(Validate)]
    struct Contact {
        #[validate(email(message = "Invalid email format"))]
        email: String,
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
    }

    #[test]
    fn test_validation_errors_conversion() {
        let contact = Contact {
            email: "nope".to_string(),
            name: String::new(),
        };

        let err = ApiError::from(contact.validate().unwrap_err());
        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(details.len(), 2);
                assert_eq!(details[0].field, "email");
                assert_eq!(details[0].message, "Invalid email format");
                assert_eq!(details[1].field, "name");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::not_found("Company").into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"], "not_found");
        assert_eq!(json["message"], "Company not found");
        assert!(json.get("details").is_none());
    }
}
