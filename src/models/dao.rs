//! DAO governance records and request DTOs

use super::subgraph::{AccountRef, SubgraphVote};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("address pattern is valid"));

/// Descriptor of the DAO being queried
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaoInfo {
    pub name: String,
    pub url: String,
}

impl DaoInfo {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A proposal from the latest-proposals listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: String,
    pub description: String,
    pub start_block: u64,
    pub end_block: u64,
    pub status: String,
    pub proposer: AccountRef,
    pub votes: Vec<SubgraphVote>,
    pub start_date: String,
    pub end_date: String,
    pub votes_for: u128,
    pub votes_against: u128,
    pub approved: bool,
    pub url: String,
    pub dao: DaoInfo,
}

/// A listed proposal joined with its proposer's delegate record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedProposal {
    pub id: String,
    pub description: String,
    pub start_block: u64,
    pub end_block: u64,
    pub status: String,
    pub proposer: AccountRef,
    pub proposer_ens_name: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub votes_for: u128,
    pub votes_against: u128,
    pub approved: bool,
    pub url: String,
    pub dao: DaoInfo,
    pub votes: Vec<SubgraphVote>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delegate {
    pub id: String,
    pub ens_name: Option<String>,
    pub delegated_votes: String,
    pub daos: Vec<DaoInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoteDirection {
    For,
    Against,
}

impl From<bool> for VoteDirection {
    fn from(support: bool) -> Self {
        if support {
            VoteDirection::For
        } else {
            VoteDirection::Against
        }
    }
}

/// One vote cast by a delegate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingHistoryEntry {
    pub proposal_description: String,
    pub protocol: String,
    pub how_they_voted: VoteDirection,
    pub number_of_votes_cast: String,
    pub proposal_id: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub url: String,
}

/// A proposal submitted by a delegate, with its outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedProposal {
    pub proposal_id: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub url: String,
    pub votes_for: u128,
    pub votes_against: u128,
    pub approved: bool,
}

/// Leaderboard entry: delegate plus voting and proposing activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegateProfile {
    pub id: String,
    pub ens_name: Option<String>,
    pub delegated_votes: String,
    pub voting_history: Vec<VotingHistoryEntry>,
    pub proposals: Vec<SubmittedProposal>,
    pub daos: Vec<DaoInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaoOverview {
    pub dao: DaoInfo,
    pub proposals: Vec<Proposal>,
    pub delegates: Vec<DelegateProfile>,
}

// ==================== Request DTOs ====================

/// `?limit=` query parameter
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LimitQuery {
    #[validate(range(min = 1, max = 1000, message = "limit must be between 1 and 1000"))]
    pub limit: Option<u32>,
}

/// `/api/delegates/{id}` path parameter
#[derive(Debug, Deserialize, Validate)]
pub struct DelegatePath {
    #[validate(custom(function = "validate_address"))]
    pub id: String,
}

/// Validate an Ethereum address (0x followed by 40 hex digits)
fn validate_address(address: &str) -> Result<(), validator::ValidationError> {
    if !ADDRESS_RE.is_match(address) {
        let mut err = validator::ValidationError::new("invalid_address");
        err.message = Some("Delegate id must be 0x followed by 40 hex characters".into());
        return Err(err);
    }
    Ok(())
}
