pub(crate) mod health;
pub(crate) mod root;
pub(crate) mod user;
