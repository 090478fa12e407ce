//! Error handling module
//!
//! Provides unified error types and handling for the entire application.
//! Every subgraph operation returns `Result<T, AppError>`, so a failed lookup
//! can never be mistaken for an empty result.

use crate::graphql::GraphQLError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("GraphQL error: {}", join_messages(.0))]
    GraphQL(Vec<GraphQLError>),

    #[error("Subgraph transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode subgraph response: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_messages(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "response contained an empty error list".to_string();
    }
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError {
    /// True when the upstream subgraph rejected the query itself
    pub fn is_graphql(&self) -> bool {
        matches!(self, AppError::GraphQL(_))
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match &self {
            AppError::GraphQL(errors) => {
                error!("GraphQL errors: {:?}", errors);
                (
                    StatusCode::BAD_GATEWAY,
                    "GRAPHQL_ERROR",
                    "The subgraph rejected the query".to_string(),
                    Some(self.to_string()),
                )
            }
            AppError::Transport(e) => {
                error!("Subgraph transport error: {:?}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_UNAVAILABLE",
                    "The subgraph could not be reached".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::Decode(msg) => {
                error!("Subgraph decode error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_DECODE_ERROR",
                    "The subgraph returned an unexpected response".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
                None,
            ),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            error: details,
            code: Some(error_code.to_string()),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper function to create a validation error
pub fn validation_error(msg: impl Into<String>) -> AppError {
    AppError::Validation(msg.into())
}

/// Helper function to create a not found error
pub fn not_found_error(msg: impl Into<String>) -> AppError {
    AppError::NotFound(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::testing::error as gql_error;

    #[test]
    fn test_graphql_error_joins_messages() {
        let err = AppError::GraphQL(vec![gql_error("bad field"), gql_error("timeout")]);
        assert_eq!(err.to_string(), "GraphQL error: bad field; timeout");
        assert!(err.is_graphql());
    }

    #[test]
    fn test_graphql_error_status_is_bad_gateway() {
        let response = AppError::GraphQL(vec![gql_error("boom")]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_not_found_status() {
        let response = not_found_error("delegate 0xabc").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_error_hides_details() {
        let response = AppError::Internal("request limiter closed".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_status() {
        let response = validation_error("limit too large").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
