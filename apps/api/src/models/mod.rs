pub mod assessment;
pub mod content;
pub mod user;
