use super::{health, user};
use crate::config::database::Database;
use crate::state::user_state::UserState;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn routes(db_conn: Arc<Database>) -> Router {
    let user_state = UserState::new(&db_conn);

    let merged_router = user::routes()
        .with_state(user_state)
        .merge(health::routes().with_state(db_conn));

    Router::new()
        .nest("/api", merged_router)
        .layer(TraceLayer::new_for_http())
}
