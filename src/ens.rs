//! ENS name resolution
//!
//! Names are best-effort enrichment: a failed lookup is logged and reported
//! as "no name" instead of failing the surrounding request.

use crate::graphql::{queries, GraphQLClient, ResponseExt};
use crate::models::subgraph::EnsDomainsData;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Maps an address to its human-readable ENS name
#[async_trait]
pub trait EnsResolver: Send + Sync {
    async fn resolve_name(&self, address: &str) -> Option<String>;
}

/// Used when no ENS endpoint is configured
pub struct NoopEnsResolver;

#[async_trait]
impl EnsResolver for NoopEnsResolver {
    async fn resolve_name(&self, _address: &str) -> Option<String> {
        None
    }
}

/// Looks names up in the ENS subgraph. Only a domain the address owns and
/// that resolves to it counts; pointing a name at someone else's address
/// does not attach it to them.
pub struct SubgraphEnsResolver {
    client: Arc<dyn GraphQLClient>,
    endpoint: String,
}

impl SubgraphEnsResolver {
    pub fn new(client: Arc<dyn GraphQLClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl EnsResolver for SubgraphEnsResolver {
    async fn resolve_name(&self, address: &str) -> Option<String> {
        let request = queries::owned_name(address);
        let result = match self.client.execute(&self.endpoint, &request).await {
            Ok(response) => response.into_data::<EnsDomainsData>(),
            Err(e) => Err(e),
        };

        match result {
            Ok(data) => {
                let name = data
                    .domains
                    .into_iter()
                    .filter(|d| d.belongs_to(address))
                    .find_map(|d| d.name);
                debug!("ENS lookup {} -> {:?}", address, name);
                name
            }
            Err(e) => {
                warn!("ENS lookup failed for {}: {}", address, e);
                None
            }
        }
    }
}
