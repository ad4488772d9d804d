use crate::error::db_error::DbError;
use crate::error::request_error::RequestError;
use crate::error::user_error::UserError;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Request(#[from] RequestError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::User(error) => error.into_response(),
            ApiError::Db(error) => error.into_response(),
            ApiError::Request(error) => error.into_response(),
        }
    }
}
