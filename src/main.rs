use std::sync::Arc;
use crate::config::{database, logging, parameter};
use crate::config::database::DatabaseTrait;
use crate::handler::health_handler;
use tracing::{error, info};

mod config;
mod routes;
mod dto;
mod error;
mod response;
mod entity;
mod repository;
mod state;
mod service;
mod handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration first so LOG_LEVEL can feed the subscriber
    parameter::init();
    logging::init_subscriber();
    logging::init();

    info!("Starting user management service...");

    health_handler::init_start_time();

    let connection = match database::Database::init().await {
        Ok(conn) => {
            info!("Database connection established successfully");
            conn
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let host = format!("{}:{}", parameter::get("SERVER_ADDRESS"), parameter::get_u64("SERVER_PORT"));

    let listener = match tokio::net::TcpListener::bind(&host).await {
        Ok(listener) => {
            info!("Server successfully bound to {}", host);
            listener
        }
        Err(e) => {
            error!("Failed to bind to {}: {}", host, e);
            return Err(e.into());
        }
    };

    let app = routes::root::routes(Arc::new(connection));

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received shutdown signal, initiating graceful shutdown..."),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }
    };

    match axum::serve(listener, app).with_graceful_shutdown(shutdown).await {
        Ok(()) => {
            info!("Server shutdown gracefully");
            Ok(())
        }
        Err(e) => {
            error!("Server error: {}", e);
            Err(e.into())
        }
    }
}
