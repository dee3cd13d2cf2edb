pub mod answer;
pub mod exercise;
pub mod question;
pub mod quiz;
pub mod quiz_response;
pub mod user;
