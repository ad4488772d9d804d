use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;

/// Role tag; decides the login channel and whether the email is derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessLevel {
    #[serde(alias = "ALUNO")]
    Student,
    Professor,
    Admin,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Student => "STUDENT",
            AccessLevel::Professor => "PROFESSOR",
            AccessLevel::Admin => "ADMIN",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
    Reactivated,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
            UserStatus::Reactivated => "REACTIVATED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tag '{}'", self.0)
    }
}

impl std::error::Error for UnknownTag {}

// Rows written by the previous system carry the Portuguese spellings.
impl FromStr for AccessLevel {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STUDENT" | "ALUNO" => Ok(AccessLevel::Student),
            "PROFESSOR" => Ok(AccessLevel::Professor),
            "ADMIN" => Ok(AccessLevel::Admin),
            _ => Err(UnknownTag(s.to_string())),
        }
    }
}

impl FromStr for UserStatus {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" | "ATIVO" => Ok(UserStatus::Active),
            "INACTIVE" | "INATIVO" => Ok(UserStatus::Inactive),
            "REACTIVATED" | "REATIVO" => Ok(UserStatus::Reactivated),
            _ => Err(UnknownTag(s.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub student_id: Option<String>,
    pub password: String,
    pub access_level: AccessLevel,
    pub status: UserStatus,
    pub registered_at: DateTime<Utc>,
}

fn decode_tag<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = UnknownTag>,
{
    let raw: String = row.try_get(column)?;
    raw.parse::<T>().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: Some(row.try_get("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            student_id: row.try_get("student_id")?,
            password: row.try_get("password")?,
            access_level: decode_tag(row, "access_level")?,
            status: decode_tag(row, "status")?,
            registered_at: row.try_get("registered_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_level_accepts_legacy_spelling() {
        assert_eq!("aluno".parse::<AccessLevel>(), Ok(AccessLevel::Student));
        assert_eq!("Professor".parse::<AccessLevel>(), Ok(AccessLevel::Professor));
        assert_eq!("ADMIN".parse::<AccessLevel>(), Ok(AccessLevel::Admin));
        assert!("JANITOR".parse::<AccessLevel>().is_err());
    }

    #[test]
    fn test_status_accepts_legacy_spelling() {
        assert_eq!("ATIVO".parse::<UserStatus>(), Ok(UserStatus::Active));
        assert_eq!("inativo".parse::<UserStatus>(), Ok(UserStatus::Inactive));
        assert_eq!("REATIVO".parse::<UserStatus>(), Ok(UserStatus::Reactivated));
        assert_eq!("reactivated".parse::<UserStatus>(), Ok(UserStatus::Reactivated));
    }

    #[test]
    fn test_tags_write_canonical_spelling() {
        for level in [AccessLevel::Student, AccessLevel::Professor, AccessLevel::Admin] {
            assert_eq!(level.as_str().parse::<AccessLevel>(), Ok(level));
        }
        assert_eq!(
            serde_json::to_string(&UserStatus::Reactivated).unwrap(),
            "\"REACTIVATED\""
        );
        assert_eq!(
            serde_json::from_str::<AccessLevel>("\"ALUNO\"").unwrap(),
            AccessLevel::Student
        );
    }
}
