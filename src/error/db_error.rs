use crate::response::app_response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Referential integrity violation: {0}")]
    ReferentialIntegrity(String),
    #[error("Row not found")]
    RowNotFound,
    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DbError::RowNotFound,
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DbError::ReferentialIntegrity(db_err.message().to_string())
            }
            other => DbError::Sqlx(other),
        }
    }
}

impl IntoResponse for DbError {
    fn into_response(self) -> Response {
        // Store details stay in the logs.
        ErrorResponse::send("Internal server error".to_string())
            .with_status(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_is_classified() {
        assert!(matches!(DbError::from(sqlx::Error::RowNotFound), DbError::RowNotFound));
    }

    #[test]
    fn test_other_errors_are_wrapped() {
        let error = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(error, DbError::Sqlx(sqlx::Error::PoolTimedOut)));
    }

    #[test]
    fn test_response_hides_details() {
        let response = DbError::Sqlx(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
