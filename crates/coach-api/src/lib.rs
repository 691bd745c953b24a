//! Typed client for the coaching backend's REST API.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod models;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::ApiError;
