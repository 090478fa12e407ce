//! Raw subgraph entities as they arrive on the wire

use serde::{Deserialize, Deserializer, Serialize};

/// The Graph serializes `BigInt` as a string and `Int` as a number
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

fn deserialize_block<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse::<u64>().map_err(serde::de::Error::custom),
    }
}

fn deserialize_numeric_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n.to_string()),
        NumberOrString::String(s) => Ok(s),
    }
}

/// `{ id }` reference to an account entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub id: String,
}

/// A vote nested under a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphVote {
    pub id: String,
    pub support: bool,
    #[serde(deserialize_with = "deserialize_numeric_string")]
    pub votes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubgraphProposal {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_block")]
    pub start_block: u64,
    #[serde(deserialize_with = "deserialize_block")]
    pub end_block: u64,
    pub status: String,
    pub proposer: AccountRef,
    #[serde(default)]
    pub votes: Vec<SubgraphVote>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubgraphDelegate {
    pub id: String,
    #[serde(deserialize_with = "deserialize_numeric_string")]
    pub delegated_votes_raw: String,
    #[serde(deserialize_with = "deserialize_numeric_string")]
    pub delegated_votes: String,
    #[serde(deserialize_with = "deserialize_numeric_string")]
    pub token_holders_represented_amount: String,
}

/// Proposal fields nested under a vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRef {
    pub id: String,
    #[serde(deserialize_with = "deserialize_block")]
    pub start_block: u64,
    #[serde(deserialize_with = "deserialize_block")]
    pub end_block: u64,
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A vote cast by a delegate, with the proposal it was cast on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphVoteWithProposal {
    pub id: String,
    pub support: bool,
    #[serde(deserialize_with = "deserialize_numeric_string")]
    pub votes: String,
    pub proposal: ProposalRef,
}

// ==================== Query result shapes ====================

#[derive(Debug, Deserialize)]
pub struct ProposalsData {
    pub proposals: Vec<SubgraphProposal>,
}

#[derive(Debug, Deserialize)]
pub struct DelegateData {
    pub delegate: Option<SubgraphDelegate>,
}

#[derive(Debug, Deserialize)]
pub struct DelegatesData {
    pub delegates: Vec<SubgraphDelegate>,
}

#[derive(Debug, Deserialize)]
pub struct VotesData {
    pub votes: Vec<SubgraphVoteWithProposal>,
}

/// An ENS domain with the accounts it resolves to and is owned by
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsDomain {
    pub name: Option<String>,
    #[serde(default)]
    pub resolved_address: Option<AccountRef>,
    pub owner: AccountRef,
}

impl EnsDomain {
    /// True when `address` both owns the domain and is its resolved address
    pub fn belongs_to(&self, address: &str) -> bool {
        let resolves = self
            .resolved_address
            .as_ref()
            .is_some_and(|a| a.id.eq_ignore_ascii_case(address));
        resolves && self.owner.id.eq_ignore_ascii_case(address)
    }
}

#[derive(Debug, Deserialize)]
pub struct EnsDomainsData {
    pub domains: Vec<EnsDomain>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blocks_accept_strings_and_numbers() {
        let proposal: SubgraphProposal = serde_json::from_value(json!({
            "id": "42",
            "description": "Raise quorum",
            "startBlock": "17000000",
            "endBlock": 17019710,
            "status": "ACTIVE",
            "proposer": { "id": "0xabc" },
            "votes": []
        }))
        .unwrap();

        assert_eq!(proposal.start_block, 17_000_000);
        assert_eq!(proposal.end_block, 17_019_710);
    }

    #[test]
    fn test_missing_votes_default_to_empty() {
        let proposal: SubgraphProposal = serde_json::from_value(json!({
            "id": "1",
            "description": null,
            "startBlock": 1,
            "endBlock": 2,
            "status": "PENDING",
            "proposer": { "id": "0xabc" }
        }))
        .unwrap();

        assert!(proposal.votes.is_empty());
        assert!(proposal.description.is_none());
    }

    #[test]
    fn test_delegate_numeric_fields_normalized_to_strings() {
        let delegate: SubgraphDelegate = serde_json::from_value(json!({
            "id": "0xabc",
            "delegatedVotesRaw": "1500000000000000000000",
            "delegatedVotes": "1500",
            "tokenHoldersRepresentedAmount": 12
        }))
        .unwrap();

        assert_eq!(delegate.delegated_votes, "1500");
        assert_eq!(delegate.token_holders_represented_amount, "12");
    }

    #[test]
    fn test_ens_domain_must_be_owned_and_resolving() {
        let owned: EnsDomain = serde_json::from_value(json!({
            "name": "gov.eth",
            "resolvedAddress": { "id": "0xabc" },
            "owner": { "id": "0xABC" }
        }))
        .unwrap();
        assert!(owned.belongs_to("0xabc"));

        let pointed_at: EnsDomain = serde_json::from_value(json!({
            "name": "impostor.eth",
            "resolvedAddress": { "id": "0xabc" },
            "owner": { "id": "0xdef" }
        }))
        .unwrap();
        assert!(!pointed_at.belongs_to("0xabc"));

        let unresolved: EnsDomain = serde_json::from_value(json!({
            "name": "parked.eth",
            "resolvedAddress": null,
            "owner": { "id": "0xabc" }
        }))
        .unwrap();
        assert!(!unresolved.belongs_to("0xabc"));
    }

    #[test]
    fn test_invalid_block_rejected() {
        let result = serde_json::from_value::<ProposalRef>(json!({
            "id": "1",
            "startBlock": "soon",
            "endBlock": 2,
            "status": "ACTIVE"
        }));
        assert!(result.is_err());
    }
}
