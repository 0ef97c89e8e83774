use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    auth::AuthError, db::DbError, reports::ReportError, routes::ErrorResponse,
    services::LabelReportError,
};

#[derive(Debug)]
pub enum AdminError {
    NotFound(String),
    Conflict(String),
    Validation(String),
    /// Malformed request input, optionally naming the offending parameter
    BadRequest {
        message: String,
        param: Option<String>,
    },
    Unauthorized,
    Forbidden(String),
    Database(DbError),
    Internal(String),
}

impl AdminError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AdminError::BadRequest {
            message: message.into(),
            param: None,
        }
    }

    pub fn bad_param(param: &str, message: impl Into<String>) -> Self {
        AdminError::BadRequest {
            message: message.into(),
            param: Some(param.to_string()),
        }
    }
}

impl From<DbError> for AdminError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => AdminError::NotFound("Resource not found".to_string()),
            DbError::Conflict(msg) => AdminError::Conflict(msg),
            DbError::Validation(msg) => AdminError::Validation(msg),
            _ => AdminError::Database(err),
        }
    }
}

impl From<AuthError> for AdminError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Forbidden(msg) => AdminError::Forbidden(msg),
            AuthError::Internal(msg) => AdminError::Internal(msg),
            _ => AdminError::Unauthorized,
        }
    }
}

impl From<ReportError> for AdminError {
    fn from(err: ReportError) -> Self {
        AdminError::bad_param("date", err.to_string())
    }
}

impl From<LabelReportError> for AdminError {
    fn from(err: LabelReportError) -> Self {
        match err {
            LabelReportError::Report(e) => e.into(),
            LabelReportError::Database(e) => e.into(),
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message, param) = match self {
            AdminError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "invalid_request_error",
                "not_found",
                msg,
                None,
            ),
            AdminError::Conflict(msg) => (
                StatusCode::CONFLICT,
                "invalid_request_error",
                "conflict",
                msg,
                None,
            ),
            AdminError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "validation_error",
                msg,
                None,
            ),
            AdminError::BadRequest { message, param } => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "bad_request",
                message,
                param,
            ),
            AdminError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "unauthorized",
                "Unauthorized".to_string(),
                None,
            ),
            AdminError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                "permission_error",
                "forbidden",
                msg,
                None,
            ),
            AdminError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "server_error",
                    "database_error",
                    "An internal database error occurred".to_string(),
                    None,
                )
            }
            AdminError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "server_error",
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = ErrorResponse::with_type(error_type, code, message);
        if let Some(param) = param {
            body = body.with_param(param);
        }
        (status, Json(body)).into_response()
    }
}
