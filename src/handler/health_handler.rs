use crate::config::database::{Database, DatabaseTrait};
use crate::config::logging::secure_log;
use crate::response::app_response::SuccessResponse;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

#[derive(Serialize, Debug)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: &'static str,
    pub database: DatabaseHealth,
}

#[derive(Serialize, Debug)]
pub struct DatabaseHealth {
    pub status: &'static str,
    pub response_time_ms: Option<u128>,
}

static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

pub fn init_start_time() {
    START_TIME.set(Instant::now()).ok();
}

fn uptime_seconds() -> u64 {
    START_TIME
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

pub async fn health_check(State(db): State<Arc<Database>>) -> SuccessResponse<HealthStatus> {
    let start = Instant::now();

    let database = match sqlx::query("SELECT 1").execute(db.get_pool()).await {
        Ok(_) => DatabaseHealth {
            status: "healthy",
            response_time_ms: Some(start.elapsed().as_millis()),
        },
        Err(e) => {
            secure_log::secure_error!("Database health check failed", e);
            DatabaseHealth {
                status: "unhealthy",
                response_time_ms: None,
            }
        }
    };

    let healthy = database.status == "healthy";
    let response = SuccessResponse::send(HealthStatus {
        status: if healthy { "healthy" } else { "unhealthy" },
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_seconds: uptime_seconds(),
        version: env!("CARGO_PKG_VERSION"),
        database,
    });

    if healthy {
        response
    } else {
        response.with_status(StatusCode::SERVICE_UNAVAILABLE)
    }
}
