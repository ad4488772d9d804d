pub(crate) mod user_dto;
