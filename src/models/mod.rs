//! Data models and DTOs (Data Transfer Objects)
//!
//! Raw subgraph entities, the reshaped records returned to clients,
//! and the request/response structures used by the API.

pub mod dao;
pub mod subgraph;

// Re-export commonly used types
pub use dao::*;

use serde::Serialize;

/// Generic success response
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}
