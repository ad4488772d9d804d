pub(crate) mod health_handler;
pub(crate) mod user_handler;
