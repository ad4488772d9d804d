use crate::config::parameter;
use async_trait::async_trait;
use sqlx::{Error, Pool, Postgres, pool::PoolOptions};
use tracing::info;

pub struct Database {
    pool: Pool<Postgres>,
}

#[async_trait]
pub trait DatabaseTrait {
    async fn init() -> Result<Self, Error>
        where
            Self: Sized;
    fn get_pool(&self) -> &Pool<Postgres>;
}

fn optional_number<T: std::str::FromStr>(key: &str, default: T) -> T {
    parameter::get_optional(key)
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

#[async_trait]
impl DatabaseTrait for Database {
    async fn init() -> Result<Self, Error> {
        let database_url = parameter::get_optional("DATABASE_URL")
            .ok_or_else(|| Error::Configuration("DATABASE_URL is not set".into()))?;

        let max_connections = optional_number("DB_MAX_CONNECTIONS", 10u32);
        let min_connections = optional_number("DB_MIN_CONNECTIONS", 1u32);
        let acquire_timeout_seconds = optional_number("DB_ACQUIRE_TIMEOUT_SECONDS", 30u64);
        let idle_timeout_seconds = optional_number("DB_IDLE_TIMEOUT_SECONDS", 600u64);
        let max_lifetime_seconds = optional_number("DB_MAX_LIFETIME_SECONDS", 1800u64);

        let pool = PoolOptions::<Postgres>::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(std::time::Duration::from_secs(acquire_timeout_seconds))
            .idle_timeout(std::time::Duration::from_secs(idle_timeout_seconds))
            .max_lifetime(std::time::Duration::from_secs(max_lifetime_seconds))
            .connect(&database_url)
            .await?;

        info!(
            "Database pool configured: max={}, min={}, acquire_timeout={}s",
            max_connections, min_connections, acquire_timeout_seconds
        );

        if parameter::get_bool("DB_RUN_MIGRATIONS") {
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| Error::Migrate(Box::new(e)))?;
            info!("Database migrations applied");
        }

        Ok(Self { pool })
    }

    fn get_pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}
