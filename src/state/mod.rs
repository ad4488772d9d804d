pub(crate) mod user_state;
