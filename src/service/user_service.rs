use crate::config::logging::secure_log;
use crate::dto::user_dto::UserUpdateDto;
use crate::entity::user::{AccessLevel, User, UserStatus};
use crate::error::api_error::ApiError;
use crate::error::db_error::DbError;
use crate::error::user_error::UserError;
use crate::repository::user_repository::UserRepositoryTrait;
use crate::service::password_service::{PasswordEncoder, DEFAULT_RESET_PASSWORD};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

const STUDENT_EMAIL_DOMAIN: &str = "estudante.fieb.edu.br";

pub fn student_email(student_id: &str) -> String {
    format!("rm{}@{}", student_id, STUDENT_EMAIL_DOMAIN)
}

fn provided(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Which field a login attempt identified the account by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoginChannel {
    Email,
    StudentId,
}

impl LoginChannel {
    fn admits(&self, level: AccessLevel) -> bool {
        match self {
            LoginChannel::Email => matches!(level, AccessLevel::Professor | AccessLevel::Admin),
            LoginChannel::StudentId => level == AccessLevel::Student,
        }
    }
}

/// User lifecycle rules. Lookups and mutations report a missing user as
/// `Ok(None)`; `Err` is reserved for store and encoding failures, except
/// `delete_user`, which reports every outcome through its error.
#[derive(Clone)]
pub struct UserService {
    user_repo: Arc<dyn UserRepositoryTrait>,
    password_encoder: PasswordEncoder,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepositoryTrait>, password_encoder: PasswordEncoder) -> Self {
        Self {
            user_repo,
            password_encoder,
        }
    }

    pub async fn register_user(&self, mut input: User) -> Result<Option<User>, ApiError> {
        let existing = if let Some(email) = provided(input.email.as_deref()) {
            self.user_repo.find_by_email(email).await?
        } else if let Some(student_id) = provided(input.student_id.as_deref()) {
            self.user_repo.find_by_student_id(student_id).await?
        } else {
            warn!("Registration rejected: neither email nor student id supplied");
            return Ok(None);
        };

        if existing.is_some() {
            info!("Registration rejected: user already registered");
            return Ok(None);
        }

        input.id = None;
        input.password = self.password_encoder.encode(&input.password)?;
        input.registered_at = Utc::now();
        input.status = UserStatus::Active;

        if input.access_level == AccessLevel::Student {
            let student_id = input.student_id.as_deref().unwrap_or_default();
            input.email = Some(student_email(student_id));
        } else {
            input.student_id = None;
        }

        let saved = self.user_repo.save(input).await?;
        info!("User registered with ID: {:?}", saved.id);
        Ok(Some(saved))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, ApiError> {
        Ok(self.user_repo.find(id).await?)
    }

    pub async fn find_all(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.user_repo.find_all().await?)
    }

    /// Strict login: exactly one identifier, and the identifier type must
    /// match the role (email for staff, student id for students).
    pub async fn authenticate(
        &self,
        email: Option<&str>,
        student_id: Option<&str>,
        password: &str,
    ) -> Result<Option<User>, ApiError> {
        if password.is_empty() {
            return Ok(None);
        }

        let (channel, candidate) = match (provided(email), provided(student_id)) {
            (Some(email), None) => (LoginChannel::Email, self.user_repo.find_by_email(email).await?),
            (None, Some(student_id)) => (
                LoginChannel::StudentId,
                self.user_repo.find_by_student_id(student_id).await?,
            ),
            _ => return Ok(None),
        };

        let Some(user) = candidate else {
            return Ok(None);
        };

        if !channel.admits(user.access_level) {
            warn!("SECURITY: Login channel {:?} refused for user ID: {:?}", channel, user.id);
            return Ok(None);
        }

        Ok(self.check_credentials(user, password))
    }

    /// Lenient login kept for older clients: email wins when present,
    /// otherwise the student id; no role gate.
    pub async fn authenticate_any_channel(
        &self,
        email: Option<&str>,
        student_id: Option<&str>,
        password: &str,
    ) -> Result<Option<User>, ApiError> {
        let candidate = match (provided(email), provided(student_id)) {
            (Some(email), _) => self.user_repo.find_by_email(email).await?,
            (None, Some(student_id)) => self.user_repo.find_by_student_id(student_id).await?,
            (None, None) => None,
        };

        Ok(candidate.and_then(|user| self.check_credentials(user, password)))
    }

    fn check_credentials(&self, user: User, password: &str) -> Option<User> {
        if user.status == UserStatus::Inactive {
            warn!("SECURITY: Login refused for inactive user ID: {:?}", user.id);
            return None;
        }

        if !self.password_encoder.verify(&user.password, password) {
            warn!("SECURITY: Invalid password attempt for user ID: {:?}", user.id);
            return None;
        }

        info!("SECURITY: Successful authentication for user ID: {:?}", user.id);
        Some(user)
    }

    pub async fn update_profile(&self, id: i64, details: UserUpdateDto) -> Result<Option<User>, ApiError> {
        let Some(mut user) = self.user_repo.find(id).await? else {
            return Ok(None);
        };

        user.name = details.name;
        user.email = details.email;
        user.access_level = details.access_level;

        self.save_existing(user).await
    }

    /// Also stamps `registered_at` and reactivates the account.
    pub async fn change_password(&self, id: i64, new_password: &str) -> Result<Option<User>, ApiError> {
        let Some(mut user) = self.user_repo.find(id).await? else {
            return Ok(None);
        };

        user.password = self.password_encoder.encode(new_password)?;
        user.registered_at = Utc::now();
        user.status = UserStatus::Active;

        let Some(saved) = self.save_existing(user).await? else {
            return Ok(None);
        };
        info!("Password changed for user ID: {}", id);
        Ok(Some(saved))
    }

    pub async fn deactivate(&self, id: i64) -> Result<Option<User>, ApiError> {
        self.reset_with_status(id, UserStatus::Inactive).await
    }

    pub async fn reactivate(&self, id: i64) -> Result<Option<User>, ApiError> {
        self.reset_with_status(id, UserStatus::Reactivated).await
    }

    async fn reset_with_status(&self, id: i64, status: UserStatus) -> Result<Option<User>, ApiError> {
        let Some(mut user) = self.user_repo.find(id).await? else {
            return Ok(None);
        };

        user.password = self.password_encoder.encode(DEFAULT_RESET_PASSWORD)?;
        user.registered_at = Utc::now();
        user.status = status;

        let Some(saved) = self.save_existing(user).await? else {
            return Ok(None);
        };
        info!("User ID: {} moved to status {}", id, status.as_str());
        Ok(Some(saved))
    }

    /// Update of a row found earlier. A row deleted in between reads as absent.
    async fn save_existing(&self, user: User) -> Result<Option<User>, ApiError> {
        match self.user_repo.save(user).await {
            Ok(saved) => Ok(Some(saved)),
            Err(DbError::RowNotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        if !self.user_repo.exists(id).await? {
            return Err(UserError::UserNotFound.into());
        }

        match self.user_repo.delete(id).await {
            Ok(()) => {
                info!("User ID: {} deleted", id);
                Ok(())
            }
            Err(DbError::ReferentialIntegrity(reason)) => {
                secure_log::sensitive_debug!("Delete of user ID {} refused: {}", id, reason);
                Err(UserError::UserHasDependents.into())
            }
            // Removed between the existence check and the delete.
            Err(DbError::RowNotFound) => Err(UserError::UserNotFound.into()),
            Err(e) => {
                secure_log::secure_error!("Failed to delete user", e);
                Err(e.into())
            }
        }
    }
}
