mod auth;
mod chat;
mod dashboard;
pub mod dto;
mod error;
mod health;
mod history;

pub use auth::{login_handler, register_handler};
pub use chat::chat_handler;
pub use dashboard::{charts_handler, metrics_handler};
pub use error::{ApiError, ErrorBody};
pub use health::health_handler;
pub use history::{conversations_handler, history_handler};
