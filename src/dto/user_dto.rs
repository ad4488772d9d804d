use crate::entity::user::{AccessLevel, User, UserStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_identifier_for_role"))]
pub struct UserRegisterDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,
    #[validate(email(message = "Email format is invalid"))]
    #[validate(length(
        max = 254,
        message = "Email must not exceed 254 characters"
    ))]
    pub email: Option<String>,
    #[serde(alias = "rm")]
    #[validate(length(
        max = 20,
        message = "Student id must not exceed 20 characters"
    ))]
    pub student_id: Option<String>,
    #[validate(length(
        min = 1,
        max = 128,
        message = "Password must be between 1 and 128 characters"
    ))]
    pub password: String,
    pub access_level: AccessLevel,
}

fn validate_identifier_for_role(dto: &UserRegisterDto) -> Result<(), ValidationError> {
    let has = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());

    match dto.access_level {
        AccessLevel::Student if !has(&dto.student_id) => Err(ValidationError::new("MISSING")
            .with_message("A student account requires a student id".into())),
        AccessLevel::Professor | AccessLevel::Admin if !has(&dto.email) => {
            Err(ValidationError::new("MISSING")
                .with_message("This access level requires an email".into()))
        }
        _ => Ok(()),
    }
}

impl UserRegisterDto {
    /// The unsaved entity handed to the service; id, status and timestamp
    /// are placeholders the service overwrites.
    pub fn into_user(self) -> User {
        User {
            id: None,
            name: self.name,
            email: self.email,
            student_id: self.student_id,
            password: self.password,
            access_level: self.access_level,
            status: UserStatus::Active,
            registered_at: Utc::now(),
        }
    }
}

/// Exactly one of `email` / `student_id` is expected; the service decides.
#[derive(Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserLoginDto {
    #[validate(length(max = 254, message = "Email must not exceed 254 characters"))]
    pub email: Option<String>,
    #[serde(alias = "rm")]
    #[validate(length(max = 20, message = "Student id must not exceed 20 characters"))]
    pub student_id: Option<String>,
    #[serde(default)]
    #[validate(length(max = 128, message = "Password must not exceed 128 characters"))]
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,
    #[validate(email(message = "Email format is invalid"))]
    pub email: Option<String>,
    pub access_level: AccessLevel,
}

#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct PasswordChangeDto {
    #[validate(length(
        min = 1,
        max = 128,
        message = "Password must be between 1 and 128 characters"
    ))]
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReadDto {
    pub id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub student_id: Option<String>,
    pub access_level: AccessLevel,
    pub status: UserStatus,
    pub registered_at: DateTime<Utc>,
}

impl From<User> for UserReadDto {
    fn from(model: User) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            student_id: model.student_id,
            access_level: model.access_level,
            status: model.status,
            registered_at: model.registered_at,
        }
    }
}

impl std::fmt::Debug for UserLoginDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserLogin")
            .field("email", &self.email)
            .field("student_id", &self.student_id)
            .finish()
    }
}

impl std::fmt::Debug for UserRegisterDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRegister")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("student_id", &self.student_id)
            .field("access_level", &self.access_level)
            .finish()
    }
}

impl std::fmt::Debug for PasswordChangeDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordChange").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(level: AccessLevel, email: Option<&str>, rm: Option<&str>) -> UserRegisterDto {
        UserRegisterDto {
            name: "Ana".to_string(),
            email: email.map(str::to_string),
            student_id: rm.map(str::to_string),
            password: "secret".to_string(),
            access_level: level,
        }
    }

    #[test]
    fn test_student_requires_student_id() {
        assert!(register(AccessLevel::Student, None, Some("123")).validate().is_ok());
        assert!(register(AccessLevel::Student, None, None).validate().is_err());
        assert!(register(AccessLevel::Student, None, Some("")).validate().is_err());
    }

    #[test]
    fn test_staff_requires_email() {
        assert!(register(AccessLevel::Admin, Some("a@school.br"), None).validate().is_ok());
        assert!(register(AccessLevel::Professor, None, Some("123")).validate().is_err());
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        assert!(register(AccessLevel::Admin, Some("not-an-email"), None).validate().is_err());
    }

    #[test]
    fn test_legacy_rm_key_is_accepted() {
        let dto: UserLoginDto =
            serde_json::from_str(r#"{"rm": "123", "password": "x"}"#).unwrap();
        assert_eq!(dto.student_id.as_deref(), Some("123"));
        assert!(dto.email.is_none());
    }

    #[test]
    fn test_read_dto_has_no_password() {
        let user = register(AccessLevel::Admin, Some("a@school.br"), None).into_user();
        let json = serde_json::to_value(UserReadDto::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["accessLevel"], "ADMIN");
    }
}
