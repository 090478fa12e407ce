//! GraphQL transport layer
//!
//! Wire types for GraphQL-over-HTTP, the client seam used by the loader,
//! and the parameterized query builders.

pub mod client;
pub mod queries;

pub use client::{GraphQLClient, HttpGraphQLClient};

use crate::error::AppError;
use serde::de::DeserializeOwned;

pub use graphql_client::Error as GraphQLError;

/// Request body: query text, operation name and bound variables
pub type GraphQLRequest = graphql_client::QueryBody<serde_json::Value>;

/// Parsed response: `data`, `errors`, or both
pub type GraphQLResponse = graphql_client::Response<serde_json::Value>;

/// Turns a raw GraphQL response into a typed result
pub trait ResponseExt {
    /// Unwrap `data`, treating any `errors` field (even an empty one) as failure
    fn into_result(self) -> Result<serde_json::Value, AppError>;

    /// Unwrap and deserialize `data` into the query's result shape
    fn into_data<T: DeserializeOwned>(self) -> Result<T, AppError>;
}

impl ResponseExt for GraphQLResponse {
    fn into_result(self) -> Result<serde_json::Value, AppError> {
        if let Some(errors) = self.errors {
            return Err(AppError::GraphQL(errors));
        }
        self.data
            .ok_or_else(|| AppError::Decode("response carried neither data nor errors".to_string()))
    }

    fn into_data<T: DeserializeOwned>(self) -> Result<T, AppError> {
        let data = self.into_result()?;
        serde_json::from_value(data).map_err(|e| AppError::Decode(e.to_string()))
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory GraphQL client for exercising the loader without a network.

    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    type Handler = dyn Fn(&GraphQLRequest) -> GraphQLResponse + Send + Sync;

    /// `QueryBody` is not `Clone`
    fn copy_request(request: &GraphQLRequest) -> GraphQLRequest {
        GraphQLRequest {
            variables: request.variables.clone(),
            query: request.query,
            operation_name: request.operation_name,
        }
    }

    /// Answers every request through a handler and records what was sent
    pub struct MockGraphQLClient {
        handler: Box<Handler>,
        calls: Mutex<Vec<(String, GraphQLRequest)>>,
    }

    impl MockGraphQLClient {
        pub fn new(
            handler: impl Fn(&GraphQLRequest) -> GraphQLResponse + Send + Sync + 'static,
        ) -> Self {
            Self {
                handler: Box::new(handler),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<(String, GraphQLRequest)> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(endpoint, request)| (endpoint.clone(), copy_request(request)))
                .collect()
        }

        pub fn calls_for(&self, operation_name: &str) -> Vec<GraphQLRequest> {
            self.calls()
                .into_iter()
                .filter(|(_, r)| r.operation_name == operation_name)
                .map(|(_, r)| r)
                .collect()
        }
    }

    #[async_trait]
    impl GraphQLClient for MockGraphQLClient {
        async fn execute(
            &self,
            endpoint: &str,
            request: &GraphQLRequest,
        ) -> Result<GraphQLResponse, AppError> {
            self.calls
                .lock()
                .unwrap()
                .push((endpoint.to_string(), copy_request(request)));
            Ok((self.handler)(request))
        }
    }

    fn response(body: serde_json::Value) -> GraphQLResponse {
        serde_json::from_value(body).expect("test response deserializes")
    }

    pub fn data(value: serde_json::Value) -> GraphQLResponse {
        response(serde_json::json!({ "data": value }))
    }

    pub fn errors(message: &str) -> GraphQLResponse {
        response(serde_json::json!({ "errors": [{ "message": message }] }))
    }

    /// A response with neither `data` nor `errors`
    pub fn empty() -> GraphQLResponse {
        response(serde_json::json!({}))
    }

    pub fn error(message: &str) -> GraphQLError {
        serde_json::from_value(serde_json::json!({ "message": message }))
            .expect("minimal GraphQL error deserializes")
    }
}
