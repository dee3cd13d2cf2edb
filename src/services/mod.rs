pub mod baseline;
pub mod exercise_service;
pub mod quiz_service;
pub mod recommendation_service;
pub mod scoring_service;
pub mod submission_service;
