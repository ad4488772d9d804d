//! In-memory user store used by unit tests in place of Postgres.

use crate::entity::user::User;
use crate::error::db_error::DbError;
use crate::repository::user_repository::UserRepositoryTrait;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    next_id: i64,
    // user ids referenced by an occurrence row
    dependents: HashSet<i64>,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    tables: RwLock<Tables>,
    writes: AtomicUsize,
    broken: AtomicBool,
    delete_on_save: AtomicBool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an occurrence row pointing at `id`.
    pub async fn add_dependent(&self, id: i64) {
        self.tables.write().await.dependents.insert(id);
    }

    /// Every following call fails as if the connection was lost.
    pub fn break_connection(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    /// The next update finds its row gone, as if deleted concurrently.
    pub fn delete_before_next_save(&self) {
        self.delete_on_save.store(true, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), DbError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(DbError::Sqlx(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepositoryTrait for InMemoryUserRepository {
    async fn find(&self, id: i64) -> Result<Option<User>, DbError> {
        self.check()?;
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, DbError> {
        self.check()?;
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn find_by_student_id(&self, student_id: &str) -> Result<Option<User>, DbError> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.student_id.as_deref() == Some(student_id))
            .cloned())
    }

    async fn exists(&self, id: i64) -> Result<bool, DbError> {
        self.check()?;
        Ok(self.tables.read().await.users.contains_key(&id))
    }

    async fn save(&self, mut user: User) -> Result<User, DbError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        if self.delete_on_save.swap(false, Ordering::SeqCst)
            && let Some(id) = user.id
        {
            tables.users.remove(&id);
        }
        let id = match user.id {
            Some(id) if tables.users.contains_key(&id) => id,
            Some(_) => return Err(DbError::RowNotFound),
            None => {
                tables.next_id += 1;
                tables.next_id
            }
        };
        user.id = Some(id);
        tables.users.insert(id, user.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        if tables.dependents.contains(&id) {
            return Err(DbError::ReferentialIntegrity(format!(
                "occurrences reference user {}",
                id
            )));
        }
        tables.users.remove(&id).ok_or(DbError::RowNotFound)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
