//! Vote tallies
//!
//! Weights are summed per side of the vote. A weight string is read by its
//! leading integer digits, so `"12.75"` counts as 12.

use crate::models::subgraph::SubgraphVote;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    pub votes_for: u128,
    pub votes_against: u128,
}

impl VoteTally {
    pub fn from_votes(votes: &[SubgraphVote]) -> Self {
        votes.iter().fold(Self::default(), |mut tally, vote| {
            let weight = parse_vote_weight(&vote.votes).unwrap_or_else(|| {
                warn!("Vote {} has unparseable weight {:?}, counting 0", vote.id, vote.votes);
                0
            });
            if vote.support {
                tally.votes_for = tally.votes_for.saturating_add(weight);
            } else {
                tally.votes_against = tally.votes_against.saturating_add(weight);
            }
            tally
        })
    }

    /// Strict majority of weight in favor
    pub fn approved(&self) -> bool {
        self.votes_for > self.votes_against
    }
}

/// Integer prefix of a weight string; `None` when there are no leading digits
pub fn parse_vote_weight(raw: &str) -> Option<u128> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() {
        return None;
    }
    // only overflow can fail here
    Some(digits.parse::<u128>().unwrap_or(u128::MAX))
}
