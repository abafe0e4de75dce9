// HTTP API Error Types
use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::JwtError;
use crate::database::manager::DatabaseError;
use crate::database::record::RecordError;
use crate::report::error::ReportError;
use crate::report::schema::SchemaError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError { .. } | ApiError::InvalidJson(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Client-safe message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::InvalidJson(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        });
        if let ApiError::ValidationError { field_errors: Some(field_errors), .. } = self {
            response["field_errors"] = json!(field_errors);
        }
        response
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(message: impl Into<String>, field_errors: Option<HashMap<String, String>>) -> Self {
        ApiError::ValidationError { message: message.into(), field_errors }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

fn field_error(field: String, message: String, summary: &str) -> ApiError {
    let mut field_errors = HashMap::new();
    field_errors.insert(field, message);
    ApiError::validation_error(summary, Some(field_errors))
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::InvalidJson(msg) => ApiError::invalid_json(msg),
            RecordError::MissingRequiredField(field) => {
                field_error(field, "This field is required".to_string(), "Missing required fields")
            }
            RecordError::NullNotAllowed(field) => {
                field_error(field, "This field cannot be null".to_string(), "Invalid field value")
            }
            RecordError::InvalidType { field, expected } => {
                field_error(field, format!("Must be {}", expected), "Invalid field value")
            }
            RecordError::InvalidUuid { field, value } => {
                field_error(field, format!("Invalid UUID format: {}", value), "Invalid field format")
            }
            RecordError::InvalidTimestamp { field, value } => {
                field_error(field, format!("Invalid timestamp format: {}", value), "Invalid field format")
            }
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Conflict(msg) => ApiError::conflict(msg),
            DatabaseError::ConfigMissing(_) | DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("Database misconfigured: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::QueryError(msg) => {
                // Don't expose internal SQL errors to clients
                tracing::error!("Database query error: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            DatabaseError::Sqlx(sqlx_err) => match &sqlx_err {
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                    tracing::error!("Database unavailable: {}", sqlx_err);
                    ApiError::service_unavailable("Database temporarily unavailable")
                }
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    tracing::warn!("Unique violation: {}", db);
                    ApiError::conflict("Record already exists")
                }
                _ => {
                    tracing::error!("SQLx error: {}", sqlx_err);
                    ApiError::internal_server_error("Database error occurred")
                }
            },
        }
    }
}

impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        tracing::error!("Schema error: {}", err);
        ApiError::internal_server_error("Report schema unavailable")
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidParameter { .. } => ApiError::bad_request(err.to_string()),
            ReportError::Validation(msg) => ApiError::validation_error(msg, None),
            ReportError::NotFound(_) => ApiError::not_found(err.to_string()),
            ReportError::Schema(e) => e.into(),
            ReportError::Storage(e) => e.into(),
            ReportError::Record(e) => e.into(),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::InvalidToken(_) => ApiError::unauthorized(err.to_string()),
            JwtError::MissingSecret | JwtError::TokenGeneration(_) => {
                tracing::error!("{}", err);
                ApiError::internal_server_error("Authentication unavailable")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_json(rejection.body_text())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_error_status_codes() {
        let cases = [
            (ReportError::invalid_parameter("page", "abc", "must be a number"), StatusCode::BAD_REQUEST),
            (ReportError::validation("limit cannot exceed 1000"), StatusCode::BAD_REQUEST),
            (ReportError::NotFound("Contractor x".to_string()), StatusCode::NOT_FOUND),
            (
                ReportError::Schema(SchemaError::MissingPrimaryKey { schema: "Widget" }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ReportError::Storage(DatabaseError::QueryError("syntax error at or near".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ReportError::Record(RecordError::MissingRequiredField("siteName".to_string())),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_invalid_parameter_message_names_value_and_constraint() {
        let api: ApiError = ReportError::invalid_parameter("limit", "0", "must be greater than 0").into();
        assert_eq!(api.message(), "invalid limit parameter: 0 (must be greater than 0)");
        assert_eq!(api.error_code(), "BAD_REQUEST");
    }

    #[test]
    fn test_storage_cause_is_not_leaked() {
        let api: ApiError = ReportError::Storage(DatabaseError::QueryError("relation \"x\" does not exist".into())).into();
        let body = api.to_json().to_string();
        assert!(!body.contains("relation"));
    }

    #[test]
    fn test_pool_timeout_is_unavailable() {
        let api: ApiError = DatabaseError::Sqlx(sqlx::Error::PoolTimedOut).into();
        assert_eq!(api.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_field_errors_in_body() {
        let api: ApiError = RecordError::InvalidType { field: "latitude".into(), expected: "a number" }.into();
        let body = api.to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field_errors"]["latitude"], "Must be a number");
    }

    #[test]
    fn test_conflict() {
        let api: ApiError = DatabaseError::Conflict("Contractor 1 already exists".into()).into();
        assert_eq!(api.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_jwt_errors() {
        let api: ApiError = JwtError::InvalidToken("ExpiredSignature".into()).into();
        assert_eq!(api.status_code(), StatusCode::UNAUTHORIZED);
        let api: ApiError = JwtError::MissingSecret.into();
        assert_eq!(api.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
