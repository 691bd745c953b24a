//! One module per backend resource. Each function issues exactly one request.

pub mod auth;
pub mod catalog;
pub mod clients;
pub mod dashboard;
pub mod diets;
pub mod export;
pub mod injuries;
pub mod notifications;
pub mod progress;
pub mod routines;
pub mod templates;
