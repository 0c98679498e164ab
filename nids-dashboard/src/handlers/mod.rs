//! HTTP handlers

pub mod alerts;
pub mod control;
pub mod dashboard;
pub mod health;
pub mod model;
pub mod stats;

use axum::http::Uri;

use crate::AppError;

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
