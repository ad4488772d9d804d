use crate::config::logging::secure_log;
use crate::dto::user_dto::{PasswordChangeDto, UserLoginDto, UserReadDto, UserRegisterDto, UserUpdateDto};
use crate::error::{api_error::ApiError, request_error::ValidatedRequest, user_error::UserError};
use crate::response::app_response::SuccessResponse;
use crate::state::user_state::UserState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::{info, warn};

type UserResponse = Result<SuccessResponse<UserReadDto>, ApiError>;

pub async fn test() -> &'static str {
    "Hello, user!"
}

pub async fn find_all(State(state): State<UserState>) -> Result<SuccessResponse<Vec<UserReadDto>>, ApiError> {
    let users = state.user_service.find_all().await?;
    Ok(SuccessResponse::send(users.into_iter().map(UserReadDto::from).collect()))
}

pub async fn find_by_id(State(state): State<UserState>, Path(id): Path<i64>) -> UserResponse {
    let user = state
        .user_service
        .find_by_id(id)
        .await?
        .ok_or(UserError::UserNotFound)?;
    Ok(SuccessResponse::send(UserReadDto::from(user)))
}

pub async fn register(
    State(state): State<UserState>,
    ValidatedRequest(payload): ValidatedRequest<UserRegisterDto>,
) -> UserResponse {
    secure_log::sensitive_debug!("User registration attempt: {:?}", payload);

    match state.user_service.register_user(payload.into_user()).await? {
        Some(user) => Ok(SuccessResponse::send(UserReadDto::from(user))
            .with_status(StatusCode::CREATED)
            .with_message("User registered successfully")),
        None => {
            warn!("Registration refused for an already registered identifier");
            Err(UserError::UserAlreadyExists.into())
        }
    }
}

pub async fn login(
    State(state): State<UserState>,
    ValidatedRequest(payload): ValidatedRequest<UserLoginDto>,
) -> UserResponse {
    secure_log::sensitive_debug!("Login attempt: {:?}", payload);

    let user = state
        .user_service
        .authenticate(payload.email.as_deref(), payload.student_id.as_deref(), &payload.password)
        .await?
        .ok_or(UserError::InvalidCredentials)?;

    info!("Login successful for user ID: {:?}", user.id);
    Ok(SuccessResponse::send(UserReadDto::from(user)))
}

pub async fn login_any_channel(
    State(state): State<UserState>,
    ValidatedRequest(payload): ValidatedRequest<UserLoginDto>,
) -> UserResponse {
    secure_log::sensitive_debug!("Any-channel login attempt: {:?}", payload);

    let user = state
        .user_service
        .authenticate_any_channel(payload.email.as_deref(), payload.student_id.as_deref(), &payload.password)
        .await?
        .ok_or(UserError::InvalidCredentials)?;

    Ok(SuccessResponse::send(UserReadDto::from(user)))
}

pub async fn update(
    State(state): State<UserState>,
    Path(id): Path<i64>,
    ValidatedRequest(payload): ValidatedRequest<UserUpdateDto>,
) -> UserResponse {
    let user = state
        .user_service
        .update_profile(id, payload)
        .await?
        .ok_or(UserError::UserNotFound)?;
    Ok(SuccessResponse::send(UserReadDto::from(user)).with_message("User updated successfully"))
}

pub async fn change_password(
    State(state): State<UserState>,
    Path(id): Path<i64>,
    ValidatedRequest(payload): ValidatedRequest<PasswordChangeDto>,
) -> UserResponse {
    let user = state
        .user_service
        .change_password(id, &payload.password)
        .await?
        .ok_or(UserError::UserNotFound)?;
    Ok(SuccessResponse::send(UserReadDto::from(user)).with_message("Password changed successfully"))
}

pub async fn deactivate(State(state): State<UserState>, Path(id): Path<i64>) -> UserResponse {
    let user = state
        .user_service
        .deactivate(id)
        .await?
        .ok_or(UserError::UserNotFound)?;
    Ok(SuccessResponse::send(UserReadDto::from(user)).with_message("User account deactivated"))
}

pub async fn reactivate(State(state): State<UserState>, Path(id): Path<i64>) -> UserResponse {
    let user = state
        .user_service
        .reactivate(id)
        .await?
        .ok_or(UserError::UserNotFound)?;
    Ok(SuccessResponse::send(UserReadDto::from(user)).with_message("User account reactivated"))
}

pub async fn delete(
    State(state): State<UserState>,
    Path(id): Path<i64>,
) -> Result<SuccessResponse<Option<()>>, ApiError> {
    state.user_service.delete_user(id).await?;
    Ok(SuccessResponse::send(None).with_message("User deleted successfully"))
}
