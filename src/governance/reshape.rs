//! Response reshaping
//!
//! Pure functions turning subgraph entities into the records served to
//! clients. Dates are the decimal string of the block number.

use super::tally::VoteTally;
use crate::models::subgraph::{SubgraphDelegate, SubgraphProposal, SubgraphVoteWithProposal};
use crate::models::{
    DaoInfo, Delegate, DelegateProfile, EnrichedProposal, Proposal, SubmittedProposal,
    VoteDirection, VotingHistoryEntry,
};

/// `{dao.url}/governance/{proposal_id}`
pub fn governance_url(dao: &DaoInfo, proposal_id: &str) -> String {
    format!("{}/governance/{}", dao.url.trim_end_matches('/'), proposal_id)
}

pub fn block_date(block: u64) -> String {
    block.to_string()
}

/// Tag a listed proposal with its DAO, dates, tallies and link
pub fn latest_proposal(raw: SubgraphProposal, dao: &DaoInfo) -> Proposal {
    let tally = VoteTally::from_votes(&raw.votes);
    Proposal {
        url: governance_url(dao, &raw.id),
        start_date: block_date(raw.start_block),
        end_date: block_date(raw.end_block),
        votes_for: tally.votes_for,
        votes_against: tally.votes_against,
        approved: tally.approved(),
        dao: dao.clone(),
        id: raw.id,
        description: raw.description.unwrap_or_default(),
        start_block: raw.start_block,
        end_block: raw.end_block,
        status: raw.status,
        proposer: raw.proposer,
        votes: raw.votes,
    }
}

/// Join a listed proposal with the DAO and ENS name of its proposer.
/// Tallies are recomputed from the vote list rather than trusted from the input.
pub fn enrich_proposal(
    proposal: Proposal,
    dao: DaoInfo,
    proposer_ens_name: Option<String>,
) -> EnrichedProposal {
    let tally = VoteTally::from_votes(&proposal.votes);
    EnrichedProposal {
        url: governance_url(&dao, &proposal.id),
        end_date: block_date(proposal.end_block),
        votes_for: tally.votes_for,
        votes_against: tally.votes_against,
        approved: tally.approved(),
        dao,
        proposer_ens_name,
        id: proposal.id,
        description: proposal.description,
        start_block: proposal.start_block,
        end_block: proposal.end_block,
        status: proposal.status,
        proposer: proposal.proposer,
        start_date: proposal.start_date,
        votes: proposal.votes,
    }
}

pub fn delegate_record(raw: SubgraphDelegate, ens_name: Option<String>, dao: &DaoInfo) -> Delegate {
    Delegate {
        id: raw.id,
        ens_name,
        delegated_votes: raw.delegated_votes,
        daos: vec![dao.clone()],
    }
}

/// One entry per vote, in subgraph order
pub fn voting_history(votes: Vec<SubgraphVoteWithProposal>, dao: &DaoInfo) -> Vec<VotingHistoryEntry> {
    votes
        .into_iter()
        .map(|vote| VotingHistoryEntry {
            url: governance_url(dao, &vote.proposal.id),
            proposal_description: vote.proposal.description.unwrap_or_default(),
            protocol: dao.name.clone(),
            how_they_voted: VoteDirection::from(vote.support),
            number_of_votes_cast: vote.votes,
            start_date: block_date(vote.proposal.start_block),
            end_date: block_date(vote.proposal.end_block),
            status: vote.proposal.status,
            proposal_id: vote.proposal.id,
        })
        .collect()
}

pub fn submitted_proposals(proposals: Vec<SubgraphProposal>, dao: &DaoInfo) -> Vec<SubmittedProposal> {
    proposals
        .into_iter()
        .map(|proposal| {
            let tally = VoteTally::from_votes(&proposal.votes);
            SubmittedProposal {
                url: governance_url(dao, &proposal.id),
                description: proposal.description.unwrap_or_default(),
                start_date: block_date(proposal.start_block),
                end_date: block_date(proposal.end_block),
                status: proposal.status,
                votes_for: tally.votes_for,
                votes_against: tally.votes_against,
                approved: tally.approved(),
                proposal_id: proposal.id,
            }
        })
        .collect()
}

pub fn delegate_profile(
    raw: SubgraphDelegate,
    ens_name: Option<String>,
    submitted: Vec<SubgraphProposal>,
    votes: Vec<SubgraphVoteWithProposal>,
    dao: &DaoInfo,
) -> DelegateProfile {
    DelegateProfile {
        id: raw.id,
        ens_name,
        delegated_votes: raw.delegated_votes,
        voting_history: voting_history(votes, dao),
        proposals: submitted_proposals(submitted, dao),
        daos: vec![dao.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::subgraph::{AccountRef, ProposalRef, SubgraphVote};
    use pretty_assertions::assert_eq;

    fn dao() -> DaoInfo {
        DaoInfo::new("Compound", "https://compound.finance/")
    }

    fn raw_proposal() -> SubgraphProposal {
        SubgraphProposal {
            id: "117".to_string(),
            description: Some("Adjust COMP speeds".to_string()),
            start_block: 16_000_100,
            end_block: 16_019_810,
            status: "EXECUTED".to_string(),
            proposer: AccountRef {
                id: "0xproposer".to_string(),
            },
            votes: vec![
                SubgraphVote {
                    id: "a".to_string(),
                    support: true,
                    votes: "5".to_string(),
                },
                SubgraphVote {
                    id: "b".to_string(),
                    support: false,
                    votes: "3".to_string(),
                },
                SubgraphVote {
                    id: "c".to_string(),
                    support: true,
                    votes: "2".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_governance_url_trims_trailing_slash() {
        assert_eq!(governance_url(&dao(), "117"), "https://compound.finance/governance/117");
        assert_eq!(
            governance_url(&DaoInfo::new("x", "https://x.org"), "1"),
            "https://x.org/governance/1"
        );
    }

    #[test]
    fn test_latest_proposal_tags_dao_and_dates() {
        let proposal = latest_proposal(raw_proposal(), &dao());

        assert_eq!(proposal.dao, dao());
        assert_eq!(proposal.start_date, "16000100");
        assert_eq!(proposal.end_date, "16019810");
        assert_eq!(proposal.votes_for, 7);
        assert_eq!(proposal.votes_against, 3);
        assert!(proposal.approved);
        assert_eq!(proposal.votes.len(), 3);
    }

    #[test]
    fn test_enriched_end_date_keeps_block_and_string_form() {
        let enriched = enrich_proposal(latest_proposal(raw_proposal(), &dao()), dao(), None);

        // both readings of endDate stay available
        assert_eq!(enriched.end_block, 16_019_810);
        assert_eq!(enriched.end_date, "16019810");
        assert_eq!(enriched.end_date, enriched.end_block.to_string());
        assert_eq!(enriched.start_date, "16000100");

        let json = serde_json::to_value(&enriched).unwrap();
        assert_eq!(json["endBlock"], 16_019_810);
        assert_eq!(json["endDate"], "16019810");
    }

    #[test]
    fn test_voting_history_entry() {
        let votes = vec![SubgraphVoteWithProposal {
            id: "v1".to_string(),
            support: false,
            votes: "1200".to_string(),
            proposal: ProposalRef {
                id: "88".to_string(),
                start_block: 10,
                end_block: 20,
                status: "DEFEATED".to_string(),
                description: Some("Lower reserve factor".to_string()),
            },
        }];

        let history = voting_history(votes, &dao());

        assert_eq!(
            history,
            vec![VotingHistoryEntry {
                proposal_description: "Lower reserve factor".to_string(),
                protocol: "Compound".to_string(),
                how_they_voted: VoteDirection::Against,
                number_of_votes_cast: "1200".to_string(),
                proposal_id: "88".to_string(),
                start_date: "10".to_string(),
                end_date: "20".to_string(),
                status: "DEFEATED".to_string(),
                url: "https://compound.finance/governance/88".to_string(),
            }]
        );
    }

    #[test]
    fn test_submitted_proposals_compute_outcome() {
        let mut losing = raw_proposal();
        losing.id = "118".to_string();
        losing.votes[1].votes = "100".to_string();

        let submitted = submitted_proposals(vec![raw_proposal(), losing], &dao());

        assert_eq!(submitted.len(), 2);
        assert!(submitted[0].approved);
        assert!(!submitted[1].approved);
        assert_eq!(submitted[1].votes_against, 100);
        assert_eq!(submitted[1].url, "https://compound.finance/governance/118");
    }

    #[test]
    fn test_delegate_record_carries_dao() {
        let raw = SubgraphDelegate {
            id: "0xabc".to_string(),
            delegated_votes_raw: "1000000000000000000".to_string(),
            delegated_votes: "1".to_string(),
            token_holders_represented_amount: "3".to_string(),
        };
        let delegate = delegate_record(raw, Some("alice.eth".to_string()), &dao());

        assert_eq!(delegate.daos, vec![dao()]);
        assert_eq!(delegate.ens_name.as_deref(), Some("alice.eth"));
        assert_eq!(delegate.delegated_votes, "1");
    }
}
