use crate::handler::user_handler;
use crate::state::user_state::UserState;
use axum::{routing::{get, post, put}, Router};

pub fn routes() -> Router<UserState> {
    Router::<UserState>::new()
        .route("/users", get(user_handler::find_all).post(user_handler::register))
        .route("/users/test", get(user_handler::test))
        .route("/users/login", post(user_handler::login))
        .route("/users/login/any-channel", post(user_handler::login_any_channel))
        .route(
            "/users/{id}",
            get(user_handler::find_by_id)
                .put(user_handler::update)
                .delete(user_handler::delete),
        )
        .route("/users/{id}/password", put(user_handler::change_password))
        .route("/users/{id}/deactivate", put(user_handler::deactivate))
        .route("/users/{id}/reactivate", put(user_handler::reactivate))
}
