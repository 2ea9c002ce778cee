pub mod histogram;

use crate::models::Participant;
use std::collections::BTreeMap;

// Derived round results, computed once at reveal time
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VoteResults {
    pub vote_counts: BTreeMap<String, u32>,
    pub average_vote: Option<f64>,
}

impl VoteResults {
    pub fn total_votes(&self) -> u64 {
        total_votes(&self.vote_counts)
    }
}

/// Tallies the votes of every participant that has voted and averages the
/// numeric ones, rounded to one decimal place.
pub fn calculate_results(participants: &[Participant]) -> VoteResults {
    let mut vote_counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut sum = 0.0;
    let mut numeric_votes = 0u32;

    for participant in participants {
        if !participant.has_voted {
            continue;
        }
        let Some(vote) = participant.vote.as_deref() else {
            continue;
        };

        *vote_counts.entry(vote.to_string()).or_insert(0) += 1;

        // "?" and any other non-numeric card only count towards the tally
        if let Some(value) = numeric_value(vote) {
            sum += value;
            numeric_votes += 1;
        }
    }

    let average_vote = if numeric_votes > 0 {
        Some(round_to_tenth(sum / numeric_votes as f64))
    } else {
        None
    };

    VoteResults {
        vote_counts,
        average_vote,
    }
}

// Counts come from snapshots written by any tab, so sum wide
pub fn total_votes(vote_counts: &BTreeMap<String, u32>) -> u64 {
    vote_counts.values().map(|&count| u64::from(count)).sum()
}

pub fn numeric_value(vote: &str) -> Option<f64> {
    vote.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
