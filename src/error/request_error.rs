use crate::response::app_response::{ErrorResponse, ValidationErrorDetail};
use axum::extract::{rejection::JsonRejection, FromRequest, Request};
use axum::{Json, response::{IntoResponse, Response}, http::StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    ValidationError(#[from] ValidationErrors),
    #[error(transparent)]
    JsonRejection(#[from] JsonRejection),
}

/// JSON body extractor that runs `validator` rules before the handler sees it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedRequest<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedRequest<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedRequest(value))
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        match self {
            RequestError::ValidationError(errors) => ErrorResponse::with_validation_errors(
                "Validation failed".to_string(),
                validation_details(&errors),
            )
            .with_status(StatusCode::BAD_REQUEST)
            .into_response(),
            RequestError::JsonRejection(_) => ErrorResponse::send(self.to_string())
                .with_status(StatusCode::BAD_REQUEST)
                .into_response(),
        }
    }
}

fn validation_details(errors: &ValidationErrors) -> Vec<ValidationErrorDetail> {
    let mut details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors
                .iter()
                .map(move |error| detail_for(field.to_string(), error))
        })
        .collect();

    // Stable output regardless of HashMap iteration order.
    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

fn detail_for(field: String, error: &ValidationError) -> ValidationErrorDetail {
    let semantic_type = match &*error.code {
        "email" => "INVALID_FORMAT",
        "length" if error.params.get("min").and_then(|v| v.as_u64()) == Some(1)
            && !error.params.contains_key("max") => "MISSING",
        "length" => "INVALID_LENGTH",
        "required" | "MISSING" => "MISSING",
        _ => "INVALID_VALUE",
    };

    ValidationErrorDetail::new(
        field,
        semantic_type.to_string(),
        error
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "Invalid value".to_string()),
    )
}
