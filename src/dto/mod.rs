pub mod exercise_dto;
pub mod quiz_dto;
pub mod response_dto;
