pub mod admin;
pub mod health;
pub mod public;
mod response;

pub use response::{ApiSuccess, ErrorResponse};
