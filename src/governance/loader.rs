//! Subgraph loader
//!
//! Orchestrates the subgraph queries behind each API operation. Per-item
//! lookups (one per proposal or per delegate) run through an
//! order-preserving buffer, and every governance subgraph request holds a
//! permit, so at most `max_concurrency` requests are in flight at once.

use super::reshape;
use crate::ens::EnsResolver;
use crate::error::{not_found_error, AppError};
use crate::graphql::{queries, GraphQLClient, GraphQLRequest, ResponseExt};
use crate::models::subgraph::{
    DelegateData, DelegatesData, ProposalsData, SubgraphDelegate, VotesData,
};
use crate::models::{DaoInfo, DaoOverview, Delegate, DelegateProfile, EnrichedProposal, Proposal};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, instrument, warn};

/// Default bound on in-flight governance subgraph requests
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

pub struct SubgraphLoader {
    client: Arc<dyn GraphQLClient>,
    ens: Arc<dyn EnsResolver>,
    max_concurrency: usize,
    permits: Semaphore,
}

impl SubgraphLoader {
    pub fn new(
        client: Arc<dyn GraphQLClient>,
        ens: Arc<dyn EnsResolver>,
        max_concurrency: usize,
    ) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            client,
            ens,
            max_concurrency,
            permits: Semaphore::new(max_concurrency),
        }
    }

    /// Run one query and decode its `data`, logging any GraphQL errors
    async fn fetch<T: DeserializeOwned>(
        &self,
        subgraph_url: &str,
        request: GraphQLRequest,
    ) -> Result<T, AppError> {
        let response = {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|e| AppError::Internal(format!("subgraph request limiter: {}", e)))?;
            self.client.execute(subgraph_url, &request).await?
        };
        if let Some(errors) = &response.errors {
            debug!(
                operation = request.operation_name,
                "GraphQL errors: {:?}", errors
            );
        }
        response.into_data()
    }

    /// Enrich an externally produced proposal list with proposer data.
    ///
    /// A proposer that is not indexed as a delegate keeps the caller's DAO
    /// and gets no ENS name; any other lookup failure fails the whole call.
    #[instrument(skip_all, fields(dao = %dao.name))]
    pub async fn get_proposals<F, Fut>(
        &self,
        subgraph_url: &str,
        dao: &DaoInfo,
        latest_proposals: F,
    ) -> Result<Vec<EnrichedProposal>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Proposal>, AppError>>,
    {
        let latest = latest_proposals().await?;

        stream::iter(latest)
            .map(|proposal| self.enrich_proposal(subgraph_url, dao, proposal))
            .buffered(self.max_concurrency)
            .try_collect()
            .await
    }

    async fn enrich_proposal(
        &self,
        subgraph_url: &str,
        dao: &DaoInfo,
        proposal: Proposal,
    ) -> Result<EnrichedProposal, AppError> {
        let (proposal_dao, ens_name) = match self
            .get_delegate_by_id(subgraph_url, &proposal.proposer.id, dao)
            .await
        {
            Ok(delegate) => (
                delegate.daos.into_iter().next().unwrap_or_else(|| dao.clone()),
                delegate.ens_name,
            ),
            Err(AppError::NotFound(_)) => {
                debug!("Proposer {} is not an indexed delegate", proposal.proposer.id);
                (dao.clone(), None)
            }
            Err(e) => return Err(e),
        };

        let enriched = reshape::enrich_proposal(proposal, proposal_dao, ens_name);
        info!(
            "Proposal {} has {} votes for and {} votes against",
            enriched.id, enriched.votes_for, enriched.votes_against
        );
        Ok(enriched)
    }

    /// Fetch one delegate and resolve its ENS name
    #[instrument(skip(self, dao))]
    pub async fn get_delegate_by_id(
        &self,
        subgraph_url: &str,
        id: &str,
        dao: &DaoInfo,
    ) -> Result<Delegate, AppError> {
        let data: DelegateData = self.fetch(subgraph_url, queries::delegate_by_id(id)).await?;
        let delegate = data
            .delegate
            .ok_or_else(|| not_found_error(format!("Delegate {} not found", id)))?;

        let ens_name = self.ens.resolve_name(&delegate.id).await;
        Ok(reshape::delegate_record(delegate, ens_name, dao))
    }

    /// Latest proposals by start block, at most `limit` (default 10)
    #[instrument(skip(self, dao), fields(dao = %dao.name))]
    pub async fn get_latest_proposals(
        &self,
        subgraph_url: &str,
        dao: &DaoInfo,
        limit: Option<u32>,
    ) -> Result<Vec<Proposal>, AppError> {
        let limit = limit.unwrap_or(queries::DEFAULT_LIMIT);
        let data: ProposalsData = self
            .fetch(subgraph_url, queries::latest_proposals(Some(limit)))
            .await?;

        let proposals: Vec<Proposal> = data
            .proposals
            .into_iter()
            .take(limit as usize)
            .map(|p| reshape::latest_proposal(p, dao))
            .collect();

        debug!("Loaded {} latest proposals", proposals.len());
        Ok(proposals)
    }

    /// Top delegates by voting weight, each with voting and proposing history
    #[instrument(skip(self, dao), fields(dao = %dao.name))]
    pub async fn get_top_delegates(
        &self,
        subgraph_url: &str,
        dao: &DaoInfo,
    ) -> Result<Vec<DelegateProfile>, AppError> {
        let data: DelegatesData = self.fetch(subgraph_url, queries::top_delegates()).await?;

        stream::iter(
            data.delegates
                .into_iter()
                .take(queries::TOP_DELEGATES_LIMIT as usize),
        )
        .map(|delegate| self.delegate_profile(subgraph_url, delegate, dao))
        .buffered(self.max_concurrency)
        .try_collect()
        .await
    }

    async fn delegate_profile(
        &self,
        subgraph_url: &str,
        delegate: SubgraphDelegate,
        dao: &DaoInfo,
    ) -> Result<DelegateProfile, AppError> {
        let (submitted, voted) = futures::try_join!(
            self.fetch::<ProposalsData>(subgraph_url, queries::submitted_proposals(&delegate.id)),
            self.fetch::<VotesData>(subgraph_url, queries::voted_proposals(&delegate.id)),
        )?;
        let ens_name = self.ens.resolve_name(&delegate.id).await;

        Ok(reshape::delegate_profile(
            delegate,
            ens_name,
            submitted.proposals,
            voted.votes,
            dao,
        ))
    }

    /// Latest proposals and top delegates side by side.
    /// A failed section is logged and served empty.
    #[instrument(skip(self, dao), fields(dao = %dao.name))]
    pub async fn get_overview(
        &self,
        subgraph_url: &str,
        dao: &DaoInfo,
        limit: Option<u32>,
    ) -> DaoOverview {
        let (proposals, delegates) = tokio::join!(
            self.get_latest_proposals(subgraph_url, dao, limit),
            self.get_top_delegates(subgraph_url, dao),
        );

        DaoOverview {
            dao: dao.clone(),
            proposals: or_empty("latest proposals", proposals),
            delegates: or_empty("top delegates", delegates),
        }
    }
}

fn or_empty<T>(section: &str, result: Result<Vec<T>, AppError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        if e.is_graphql() {
            warn!("Serving empty {} section: {}", section, e);
        } else {
            error!("Serving empty {} section, subgraph unreachable: {}", section, e);
        }
        Vec::new()
    })
}
