//! DAO governance route handlers
//!
//! Thin wrappers over the subgraph loader for the configured DAO.

use crate::error::{validation_error, ApiResult};
use crate::models::{
    DaoOverview, Delegate, DelegatePath, DelegateProfile, EnrichedProposal, LimitQuery, Proposal,
    SuccessResponse,
};
use crate::state::SharedState;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use validator::Validate;

// ==================== Response Types ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalListResponse {
    pub success: bool,
    pub count: usize,
    pub proposals: Vec<Proposal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedProposalListResponse {
    pub success: bool,
    pub count: usize,
    pub proposals: Vec<EnrichedProposal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegateListResponse {
    pub success: bool,
    pub count: usize,
    pub delegates: Vec<DelegateProfile>,
}

// ==================== Handlers ====================

/// Latest proposals
pub async fn latest_proposals(
    State(state): State<SharedState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<ProposalListResponse>> {
    query.validate().map_err(|e| validation_error(e.to_string()))?;

    let proposals = state
        .loader
        .get_latest_proposals(&state.subgraph_url, &state.dao, query.limit)
        .await?;

    Ok(Json(ProposalListResponse {
        success: true,
        count: proposals.len(),
        proposals,
    }))
}

/// Latest proposals joined with proposer data
pub async fn enriched_proposals(
    State(state): State<SharedState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<EnrichedProposalListResponse>> {
    query.validate().map_err(|e| validation_error(e.to_string()))?;

    let proposals = state
        .loader
        .get_proposals(&state.subgraph_url, &state.dao, || {
            state
                .loader
                .get_latest_proposals(&state.subgraph_url, &state.dao, query.limit)
        })
        .await?;

    Ok(Json(EnrichedProposalListResponse {
        success: true,
        count: proposals.len(),
        proposals,
    }))
}

/// Top delegates leaderboard
pub async fn top_delegates(
    State(state): State<SharedState>,
) -> ApiResult<Json<DelegateListResponse>> {
    let delegates = state
        .loader
        .get_top_delegates(&state.subgraph_url, &state.dao)
        .await?;

    Ok(Json(DelegateListResponse {
        success: true,
        count: delegates.len(),
        delegates,
    }))
}

/// Single delegate by address
pub async fn delegate_by_id(
    State(state): State<SharedState>,
    Path(path): Path<DelegatePath>,
) -> ApiResult<Json<SuccessResponse<Delegate>>> {
    path.validate().map_err(|e| validation_error(e.to_string()))?;

    // subgraph ids are lowercase hex
    let id = path.id.to_lowercase();
    let delegate = state
        .loader
        .get_delegate_by_id(&state.subgraph_url, &id, &state.dao)
        .await?;

    Ok(Json(SuccessResponse::with_data(
        format!("Delegate {} loaded", delegate.id),
        delegate,
    )))
}

/// Dashboard: latest proposals plus top delegates, each section best-effort
pub async fn overview(
    State(state): State<SharedState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<SuccessResponse<DaoOverview>>> {
    query.validate().map_err(|e| validation_error(e.to_string()))?;

    let overview = state
        .loader
        .get_overview(&state.subgraph_url, &state.dao, query.limit)
        .await;

    Ok(Json(SuccessResponse::with_data(
        format!("{} governance overview", overview.dao.name),
        overview,
    )))
}
