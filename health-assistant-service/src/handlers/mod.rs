//! HTTP handlers for the health assistant service.

pub mod chat;
pub mod health;

pub use chat::chat;
pub use health::{health_check, not_found, readiness_check, root};
