//! Vote tallying
//!
//! Aggregates raw votes into one winner per category. Pure functions only.
//!
//! Ties go to the value whose first vote appears earliest in the input.
//! Storage returns votes in insertion order, so in practice the first
//! value stored wins a tie.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Vote;

/// Outcome for a single category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTally {
    pub winner: String,
    pub count: u32,
    pub all_counts: BTreeMap<String, u32>,
}

/// Outcome for every category, keyed by category name
pub type TallyResult = BTreeMap<String, CategoryTally>;

struct ValueCount {
    count: u32,
    first_seen: usize,
}

/// Count votes per (category, value) and pick a winner per category
pub fn tally(votes: &[Vote]) -> TallyResult {
    let mut grouped: BTreeMap<&str, BTreeMap<&str, ValueCount>> = BTreeMap::new();

    for (position, vote) in votes.iter().enumerate() {
        grouped
            .entry(vote.category.as_str())
            .or_default()
            .entry(vote.value.as_str())
            .or_insert_with(|| ValueCount {
                count: 0,
                first_seen: position,
            })
            .count += 1;
    }

    grouped
        .into_iter()
        .filter_map(|(category, values)| {
            let (winner, top) = values
                .iter()
                .max_by(|(_, a), (_, b)| {
                    a.count
                        .cmp(&b.count)
                        .then_with(|| b.first_seen.cmp(&a.first_seen))
                })
                .map(|(value, counted)| (value.to_string(), counted.count))?;

            let all_counts = values
                .iter()
                .map(|(value, counted)| (value.to_string(), counted.count))
                .collect();

            Some((
                category.to_string(),
                CategoryTally {
                    winner,
                    count: top,
                    all_counts,
                },
            ))
        })
        .collect()
}

/// Build a tally-shaped result from a decider's picks
///
/// Categories the decider picked use the pick. Categories without a pick use
/// the ordinary tally winner. Categories with neither votes nor a pick fall
/// back to the first entry of `defaults`.
pub fn override_winners(
    picks: &BTreeMap<String, String>,
    votes: &[Vote],
    defaults: &BTreeMap<String, Vec<String>>,
) -> TallyResult {
    let mut result = tally(votes);

    for (category, pick) in picks {
        let all_counts = result
            .remove(category)
            .map(|counted| counted.all_counts)
            .unwrap_or_default();
        let count = all_counts.get(pick).copied().unwrap_or(0);
        result.insert(
            category.clone(),
            CategoryTally {
                winner: pick.clone(),
                count,
                all_counts,
            },
        );
    }

    for (category, options) in defaults {
        if result.contains_key(category) {
            continue;
        }
        if let Some(first) = options.first() {
            result.insert(
                category.clone(),
                CategoryTally {
                    winner: first.clone(),
                    count: 0,
                    all_counts: BTreeMap::new(),
                },
            );
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn votes(entries: &[(&str, &str)]) -> Vec<Vote> {
        let event_id = Uuid::new_v4();
        entries
            .iter()
            .map(|(category, value)| {
                Vote::new(
                    event_id,
                    Uuid::new_v4(),
                    "Voter".into(),
                    category.to_string(),
                    value.to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_winner_and_counts() {
        let result = tally(&votes(&[
            ("protein", "Chicken"),
            ("protein", "Chicken"),
            ("protein", "Lamb"),
        ]));

        let protein = &result["protein"];
        assert_eq!(protein.winner, "Chicken");
        assert_eq!(protein.count, 2);
        assert_eq!(protein.all_counts.len(), 2);
        assert_eq!(protein.all_counts["Chicken"], 2);
        assert_eq!(protein.all_counts["Lamb"], 1);
    }

    #[test]
    fn test_tally_is_deterministic() {
        let input = votes(&[
            ("protein", "Beef"),
            ("side", "Roasties"),
            ("protein", "Lamb"),
            ("side", "Mash"),
            ("dessert", "Crumble"),
        ]);

        let first = tally(&input);
        for _ in 0..5 {
            assert_eq!(tally(&input), first);
        }
    }

    #[test]
    fn test_tie_goes_to_earliest_cast() {
        let result = tally(&votes(&[
            ("protein", "Lamb"),
            ("protein", "Beef"),
            ("protein", "Beef"),
            ("protein", "Lamb"),
        ]));
        assert_eq!(result["protein"].winner, "Lamb");
        assert_eq!(result["protein"].count, 2);

        let flipped = tally(&votes(&[("protein", "Beef"), ("protein", "Lamb")]));
        assert_eq!(flipped["protein"].winner, "Beef");
    }

    #[test]
    fn test_categories_are_independent() {
        let result = tally(&votes(&[
            ("protein", "Beef"),
            ("side", "Yorkshire pudding"),
            ("side", "Yorkshire pudding"),
        ]));
        assert_eq!(result.len(), 2);
        assert_eq!(result["protein"].winner, "Beef");
        assert_eq!(result["side"].count, 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(tally(&[]).is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = tally(&votes(&[("protein", "Chicken")]));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["protein"]["allCounts"]["Chicken"], 1);
        assert_eq!(json["protein"]["winner"], "Chicken");
    }

    #[test]
    fn test_override_pick_beats_votes() {
        let input = votes(&[("protein", "Chicken"), ("protein", "Chicken"), ("protein", "Beef")]);
        let picks = BTreeMap::from([("protein".to_string(), "Beef".to_string())]);

        let result = override_winners(&picks, &input, &BTreeMap::new());
        assert_eq!(result["protein"].winner, "Beef");
        assert_eq!(result["protein"].count, 1);
        assert_eq!(result["protein"].all_counts["Chicken"], 2);
    }

    #[test]
    fn test_override_falls_back_to_defaults() {
        let input = votes(&[("protein", "Lamb")]);
        let defaults = BTreeMap::from([
            ("protein".to_string(), vec!["Beef".to_string()]),
            (
                "dessert".to_string(),
                vec!["Sticky toffee".to_string(), "Trifle".to_string()],
            ),
            ("drinks".to_string(), Vec::new()),
        ]);

        let result = override_winners(&BTreeMap::new(), &input, &defaults);
        assert_eq!(result["protein"].winner, "Lamb");
        assert_eq!(result["dessert"].winner, "Sticky toffee");
        assert_eq!(result["dessert"].count, 0);
        assert!(!result.contains_key("drinks"));
    }
}
