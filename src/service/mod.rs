pub(crate) mod password_service;
pub(crate) mod user_service;
