//! Query builders
//!
//! Every caller-supplied value travels as a bound variable; nothing is
//! spliced into the query text.

use super::GraphQLRequest;
use serde_json::json;

/// Page size used when the caller does not ask for one
pub const DEFAULT_LIMIT: u32 = 10;

/// Fixed size of the top-delegates leaderboard
pub const TOP_DELEGATES_LIMIT: u32 = 10;

/// Submitted / voted proposals fetched per delegate
pub const PER_DELEGATE_LIMIT: u32 = 10;

const LATEST_PROPOSALS: &str = r#"
query LatestProposals($first: Int!) {
  proposals(first: $first, orderBy: startBlock, orderDirection: desc) {
    id
    description
    startBlock
    endBlock
    status
    proposer {
      id
    }
    votes {
      id
      support
      votes
    }
  }
}
"#;

const DELEGATE_BY_ID: &str = r#"
query DelegateById($id: ID!) {
  delegate(id: $id) {
    id
    delegatedVotesRaw
    delegatedVotes
    tokenHoldersRepresentedAmount
  }
}
"#;

const TOP_DELEGATES: &str = r#"
query TopDelegates($first: Int!) {
  delegates(first: $first, orderBy: delegatedVotes, orderDirection: desc) {
    id
    delegatedVotesRaw
    delegatedVotes
    tokenHoldersRepresentedAmount
  }
}
"#;

const SUBMITTED_PROPOSALS: &str = r#"
query SubmittedProposals($proposer: String!, $first: Int!) {
  proposals(where: { proposer: $proposer }, first: $first) {
    id
    description
    startBlock
    endBlock
    status
    proposer {
      id
    }
    votes {
      id
      support
      votes
    }
  }
}
"#;

const VOTED_PROPOSALS: &str = r#"
query VotedProposals($voter: String!, $first: Int!) {
  votes(first: $first, where: { voter: $voter }) {
    id
    support
    votes
    proposal {
      id
      startBlock
      endBlock
      status
      description
    }
  }
}
"#;

const OWNED_NAME: &str = r#"
query OwnedName($address: String!) {
  domains(
    first: 1
    where: { resolvedAddress: $address, owner: $address }
    orderBy: createdAt
    orderDirection: asc
  ) {
    name
    resolvedAddress {
      id
    }
    owner {
      id
    }
  }
}
"#;

/// Latest proposals, newest `startBlock` first
pub fn latest_proposals(limit: Option<u32>) -> GraphQLRequest {
    GraphQLRequest {
        query: LATEST_PROPOSALS,
        operation_name: "LatestProposals",
        variables: json!({ "first": limit.unwrap_or(DEFAULT_LIMIT) }),
    }
}

pub fn delegate_by_id(id: &str) -> GraphQLRequest {
    GraphQLRequest {
        query: DELEGATE_BY_ID,
        operation_name: "DelegateById",
        variables: json!({ "id": id }),
    }
}

pub fn top_delegates() -> GraphQLRequest {
    GraphQLRequest {
        query: TOP_DELEGATES,
        operation_name: "TopDelegates",
        variables: json!({ "first": TOP_DELEGATES_LIMIT }),
    }
}

pub fn submitted_proposals(proposer: &str) -> GraphQLRequest {
    GraphQLRequest {
        query: SUBMITTED_PROPOSALS,
        operation_name: "SubmittedProposals",
        variables: json!({ "proposer": proposer, "first": PER_DELEGATE_LIMIT }),
    }
}

pub fn voted_proposals(voter: &str) -> GraphQLRequest {
    GraphQLRequest {
        query: VOTED_PROPOSALS,
        operation_name: "VotedProposals",
        variables: json!({ "voter": voter, "first": PER_DELEGATE_LIMIT }),
    }
}

/// Oldest ENS name that the address owns and that resolves back to it.
/// ENS subgraph ids are lowercase hex, so the address is normalized here.
pub fn owned_name(address: &str) -> GraphQLRequest {
    GraphQLRequest {
        query: OWNED_NAME,
        operation_name: "OwnedName",
        variables: json!({ "address": address.to_lowercase() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_proposals_defaults_to_ten() {
        let request = latest_proposals(None);
        assert_eq!(request.variables["first"], 10);
        assert!(request.query.contains("orderBy: startBlock, orderDirection: desc"));
    }

    #[test]
    fn test_latest_proposals_custom_limit() {
        assert_eq!(latest_proposals(Some(25)).variables["first"], 25);
    }

    #[test]
    fn test_ids_are_bound_not_interpolated() {
        let hostile = r#"0xabc") { id } evil: delegates(first: 1000"#;
        let request = delegate_by_id(hostile);

        assert!(!request.query.contains(hostile));
        assert_eq!(request.variables["id"], hostile);
    }

    #[test]
    fn test_top_delegates_fixed_page() {
        let request = top_delegates();
        assert_eq!(request.variables["first"], TOP_DELEGATES_LIMIT);
        assert!(request.query.contains("orderBy: delegatedVotes"));
    }

    #[test]
    fn test_per_delegate_queries_filter_by_address() {
        let submitted = submitted_proposals("0xdead");
        assert_eq!(submitted.variables["proposer"], "0xdead");
        assert_eq!(submitted.variables["first"], 10);
        assert!(submitted.query.contains("where: { proposer: $proposer }"));

        let voted = voted_proposals("0xdead");
        assert_eq!(voted.variables["voter"], "0xdead");
        assert!(voted.query.contains("where: { voter: $voter }"));
    }

    #[test]
    fn test_operation_names_match_query_text() {
        for request in [
            latest_proposals(None),
            delegate_by_id("0x1"),
            top_delegates(),
            submitted_proposals("0x1"),
            voted_proposals("0x1"),
            owned_name("0x1"),
        ] {
            let header = format!("query {}(", request.operation_name);
            assert!(request.query.contains(&header), "missing {}", header);
        }
    }

    #[test]
    fn test_owned_name_lowercases_address() {
        let request = owned_name("0xABCDEF");
        assert_eq!(request.variables["address"], "0xabcdef");
    }

    #[test]
    fn test_owned_name_requires_ownership_and_stable_order() {
        let request = owned_name("0x1");
        assert!(request
            .query
            .contains("where: { resolvedAddress: $address, owner: $address }"));
        assert!(request.query.contains("orderBy: createdAt"));
    }
}
