//! GraphQL-over-HTTP client
//!
//! `GraphQLClient` is the seam the loader and the ENS resolver depend on;
//! `HttpGraphQLClient` is the reqwest-backed implementation used in production.

use super::{GraphQLRequest, GraphQLResponse};
use crate::error::AppError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Executes a GraphQL request against a subgraph endpoint
#[async_trait]
pub trait GraphQLClient: Send + Sync {
    async fn execute(
        &self,
        endpoint: &str,
        request: &GraphQLRequest,
    ) -> Result<GraphQLResponse, AppError>;
}

/// reqwest-backed client; one connection pool shared by all requests
pub struct HttpGraphQLClient {
    http: reqwest::Client,
}

impl HttpGraphQLClient {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl GraphQLClient for HttpGraphQLClient {
    async fn execute(
        &self,
        endpoint: &str,
        request: &GraphQLRequest,
    ) -> Result<GraphQLResponse, AppError> {
        debug!("POST {} operation={}", endpoint, request.operation_name);

        let response = self.http.post(endpoint).json(request).send().await?;
        let status = response.status();
        let status_error = response.error_for_status_ref().err();
        let body = response.bytes().await?;

        // graph-node reports query errors with non-2xx statuses too; keep those
        // as GraphQL errors and only fall back to a transport error otherwise.
        match (serde_json::from_slice::<GraphQLResponse>(&body), status_error) {
            (Ok(parsed), _) if parsed.data.is_some() || parsed.errors.is_some() => Ok(parsed),
            (_, Some(err)) => Err(AppError::Transport(err)),
            (Ok(parsed), None) => Ok(parsed),
            (Err(e), None) => Err(AppError::Decode(format!(
                "invalid JSON from subgraph (HTTP {}): {}",
                status, e
            ))),
        }
    }
}
