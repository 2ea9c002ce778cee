use crate::models::{is_poker_value, POKER_VALUES};
use crate::voting::numeric_value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartBar {
    pub label: String,
    pub votes: u32,
}

/// Bars in card display order; values nobody picked are left out. Labels not
/// on the deck (old snapshots may carry "8.0") follow in label order.
pub fn chart_bars(vote_counts: &BTreeMap<String, u32>) -> Vec<ChartBar> {
    let deck = POKER_VALUES.iter().filter_map(|value| {
        let votes = vote_counts.get(*value).copied().unwrap_or(0);
        (votes > 0).then(|| ChartBar {
            label: value.to_string(),
            votes,
        })
    });

    let mut off_deck: Vec<(&str, u32)> = vote_counts
        .iter()
        .filter(|(value, count)| **count > 0 && !is_poker_value(value))
        .map(|(value, count)| (value.as_str(), *count))
        .collect();
    off_deck.sort_by(|(a, _), (b, _)| compare_labels(a, b));

    deck.chain(off_deck.into_iter().map(|(label, votes)| ChartBar {
        label: label.to_string(),
        votes,
    }))
    .collect()
}

/// Every tallied value with its count, numbers ascending first, then text.
pub fn sorted_counts(vote_counts: &BTreeMap<String, u32>) -> Vec<(&str, u32)> {
    let mut counts: Vec<(&str, u32)> = vote_counts
        .iter()
        .map(|(value, count)| (value.as_str(), *count))
        .collect();
    counts.sort_by(|(a, _), (b, _)| compare_labels(a, b));
    counts
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    match (numeric_value(a), numeric_value(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u32)]) -> BTreeMap<String, u32> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn bars_follow_card_order() {
        let bars = chart_bars(&counts(&[("?", 1), ("13", 2), ("3", 1)]));
        let labels: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["3", "13", "?"]);
        assert_eq!(bars[1].votes, 2);
    }

    #[test]
    fn off_deck_labels_are_drawn_after_the_deck() {
        let bars = chart_bars(&counts(&[("8.0", 1), ("?", 1), ("5", 2), ("2.5", 1)]));
        let labels: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["5", "?", "2.5", "8.0"]);
        let drawn: u32 = bars.iter().map(|b| b.votes).sum();
        assert_eq!(drawn, 5);
    }

    #[test]
    fn counts_sort_numerically_before_text() {
        // BTreeMap alone would put "100" before "20"
        let binding = counts(&[("100", 1), ("20", 3), ("?", 2), ("5", 1)]);
        let sorted = sorted_counts(&binding);
        assert_eq!(sorted, vec![("5", 1), ("20", 3), ("100", 1), ("?", 2)]);
    }
}
