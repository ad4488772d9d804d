use crate::config::database::Database;
use crate::repository::user_repository::UserRepository;
use crate::service::password_service::PasswordEncoder;
use crate::service::user_service::UserService;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserState {
    pub user_service: UserService,
}

impl UserState {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        let user_repo = Arc::new(UserRepository::new(db_conn));
        Self::with_service(UserService::new(user_repo, PasswordEncoder::from_parameters()))
    }

    pub fn with_service(user_service: UserService) -> Self {
        Self { user_service }
    }
}
