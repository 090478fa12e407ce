//! Application state management
//!
//! Contains shared state accessible across all handlers.
//! Nothing is cached between requests: every handler queries the subgraph.

use crate::config::Settings;
use crate::ens::{EnsResolver, NoopEnsResolver, SubgraphEnsResolver};
use crate::error::AppError;
use crate::governance::SubgraphLoader;
use crate::graphql::{GraphQLClient, HttpGraphQLClient};
use crate::models::DaoInfo;
use std::sync::Arc;
use tracing::info;

/// Application state shared across all handlers
pub struct AppState {
    /// Query orchestration over the governance subgraph
    pub loader: SubgraphLoader,

    /// Governance subgraph endpoint
    pub subgraph_url: String,

    /// The DAO this instance serves
    pub dao: DaoInfo,
}

impl AppState {
    pub fn new(loader: SubgraphLoader, subgraph_url: impl Into<String>, dao: DaoInfo) -> Self {
        Self {
            loader,
            subgraph_url: subgraph_url.into(),
            dao,
        }
    }

    /// Wire the HTTP client and ENS resolver described by the settings
    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let client: Arc<dyn GraphQLClient> =
            Arc::new(HttpGraphQLClient::new(settings.subgraph.timeout)?);

        let ens: Arc<dyn EnsResolver> = match &settings.ens.subgraph_url {
            Some(url) => {
                info!("ENS names resolved via {}", url);
                Arc::new(SubgraphEnsResolver::new(client.clone(), url.clone()))
            }
            None => {
                info!("ENS_SUBGRAPH_URL not set, ENS names disabled");
                Arc::new(NoopEnsResolver)
            }
        };

        let loader = SubgraphLoader::new(client, ens, settings.subgraph.max_concurrency);
        Ok(Self::new(
            loader,
            settings.subgraph.url.clone(),
            settings.subgraph.dao.clone(),
        ))
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
