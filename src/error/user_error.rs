use crate::response::app_response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User not found")]
    UserNotFound,
    #[error("User already exists")]
    UserAlreadyExists,
    /// Deliberately says nothing about which check failed.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User has associated occurrences and cannot be deleted")]
    UserHasDependents,
    #[error("Password encoding failed")]
    PasswordEncoding,
    #[error("Password is too long")]
    PasswordTooLong,
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status_code = match self {
            UserError::UserNotFound => StatusCode::NOT_FOUND,
            UserError::UserAlreadyExists => StatusCode::BAD_REQUEST,
            UserError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            UserError::UserHasDependents => StatusCode::CONFLICT,
            UserError::PasswordEncoding => StatusCode::INTERNAL_SERVER_ERROR,
            UserError::PasswordTooLong => StatusCode::BAD_REQUEST,
        };

        ErrorResponse::send(self.to_string()).with_status(status_code).into_response()
    }
}
