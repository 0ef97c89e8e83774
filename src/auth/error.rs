use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::routes::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No bearer token on the request
    #[error("authentication credentials required")]
    MissingCredentials,

    /// Token failed signature, issuer or shape checks
    #[error("invalid authentication token")]
    InvalidToken,

    #[error("authentication token has expired")]
    ExpiredToken,

    /// Token is valid but its account no longer exists or is inactive
    #[error("account is not active")]
    InactiveAccount,

    /// Authenticated, but the account's role may not perform the operation
    #[error("{0}")]
    Forbidden(String),

    #[error("internal authentication error: {0}")]
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AuthError::MissingCredentials => (StatusCode::UNAUTHORIZED, "missing_credentials"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token"),
            AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "expired_token"),
            AuthError::InactiveAccount => (StatusCode::UNAUTHORIZED, "inactive_account"),
            AuthError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            AuthError::Internal(msg) => {
                tracing::error!(error = %msg, "Authentication error");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::with_type(
                        "server_error",
                        "internal_error",
                        "An internal error occurred",
                    )),
                )
                    .into_response();
            }
        };

        let error_type = if status == StatusCode::FORBIDDEN {
            "permission_error"
        } else {
            "authentication_error"
        };

        (
            status,
            Json(ErrorResponse::with_type(error_type, code, self.to_string())),
        )
            .into_response()
    }
}
