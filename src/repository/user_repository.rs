use crate::config::database::{Database, DatabaseTrait};
use crate::config::logging::secure_log;
use crate::entity::user::User;
use crate::error::db_error::DbError;
use async_trait::async_trait;
use std::sync::Arc;

const USER_COLUMNS: &str =
    "id, name, email, student_id, password, access_level, status, registered_at";

#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    async fn find(&self, id: i64) -> Result<Option<User>, DbError>;
    async fn find_all(&self) -> Result<Vec<User>, DbError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError>;
    async fn find_by_student_id(&self, student_id: &str) -> Result<Option<User>, DbError>;
    async fn exists(&self, id: i64) -> Result<bool, DbError>;
    /// Inserts when `user.id` is `None`, updates otherwise.
    async fn save(&self, user: User) -> Result<User, DbError>;
    async fn delete(&self, id: i64) -> Result<(), DbError>;
}

#[derive(Clone)]
pub struct UserRepository {
    pub(crate) db_conn: Arc<Database>,
}

impl UserRepository {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            db_conn: Arc::clone(db_conn),
        }
    }

    async fn find_one_by(&self, column: &str, value: &str) -> Result<Option<User>, DbError> {
        let start = std::time::Instant::now();

        let query = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        match sqlx::query_as::<_, User>(&query)
            .bind(value)
            .fetch_optional(self.db_conn.get_pool())
            .await
        {
            Ok(user) => {
                secure_log::sensitive_debug!("User lookup by {} completed in {:?}", column, start.elapsed());
                Ok(user)
            }
            Err(e) => {
                secure_log::secure_error!(format!("User lookup by {} failed", column), e);
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn find(&self, id: i64) -> Result<Option<User>, DbError> {
        let start = std::time::Instant::now();

        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        match sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(self.db_conn.get_pool())
            .await
        {
            Ok(user) => {
                secure_log::sensitive_debug!("User lookup by ID completed in {:?}", start.elapsed());
                Ok(user)
            }
            Err(e) => {
                secure_log::secure_error!("User lookup by ID failed", e);
                Err(e.into())
            }
        }
    }

    async fn find_all(&self) -> Result<Vec<User>, DbError> {
        let query = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
        sqlx::query_as::<_, User>(&query)
            .fetch_all(self.db_conn.get_pool())
            .await
            .map_err(|e| {
                secure_log::secure_error!("Listing users failed", e);
                DbError::from(e)
            })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        self.find_one_by("email", email).await
    }

    async fn find_by_student_id(&self, student_id: &str) -> Result<Option<User>, DbError> {
        self.find_one_by("student_id", student_id).await
    }

    async fn exists(&self, id: i64) -> Result<bool, DbError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(self.db_conn.get_pool())
            .await
            .map_err(|e| {
                secure_log::secure_error!("User existence check failed", e);
                DbError::from(e)
            })
    }

    async fn save(&self, user: User) -> Result<User, DbError> {
        let start = std::time::Instant::now();

        let result = match user.id {
            None => {
                let query = format!(
                    "INSERT INTO users (name, email, student_id, password, access_level, status, registered_at) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
                    USER_COLUMNS
                );
                sqlx::query_as::<_, User>(&query)
                    .bind(&user.name)
                    .bind(&user.email)
                    .bind(&user.student_id)
                    .bind(&user.password)
                    .bind(user.access_level.as_str())
                    .bind(user.status.as_str())
                    .bind(user.registered_at)
                    .fetch_one(self.db_conn.get_pool())
                    .await
            }
            Some(id) => {
                let query = format!(
                    "UPDATE users SET name = $1, email = $2, student_id = $3, password = $4, \
                     access_level = $5, status = $6, registered_at = $7 WHERE id = $8 RETURNING {}",
                    USER_COLUMNS
                );
                sqlx::query_as::<_, User>(&query)
                    .bind(&user.name)
                    .bind(&user.email)
                    .bind(&user.student_id)
                    .bind(&user.password)
                    .bind(user.access_level.as_str())
                    .bind(user.status.as_str())
                    .bind(user.registered_at)
                    .bind(id)
                    .fetch_one(self.db_conn.get_pool())
                    .await
            }
        };

        match result {
            Ok(saved) => {
                secure_log::sensitive_debug!("User saved in {:?}", start.elapsed());
                Ok(saved)
            }
            Err(e) => {
                secure_log::secure_error!("Failed to save user", e);
                Err(e.into())
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let start = std::time::Instant::now();

        let result = match sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.db_conn.get_pool())
            .await
        {
            Ok(result) => result,
            Err(e) => {
                let error = DbError::from(e);
                // FK refusals are an expected outcome, not a failure
                if !matches!(error, DbError::ReferentialIntegrity(_)) {
                    secure_log::secure_error!("Failed to delete user", error);
                }
                return Err(error);
            }
        };

        secure_log::sensitive_debug!("User delete completed in {:?}", start.elapsed());
        if result.rows_affected() == 0 {
            return Err(DbError::RowNotFound);
        }
        Ok(())
    }
}
