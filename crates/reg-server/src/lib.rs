//! # reg-server
//!
//! HTTP surface of the registrar: one `POST` endpoint that validates a
//! student registration, stores its marksheet, and persists the record.

pub mod app;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;

pub use app::{AppState, REGISTER_PATH, build_router};
pub use error::ApiError;
