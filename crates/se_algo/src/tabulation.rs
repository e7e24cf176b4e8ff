// --------------------------------------------------------------------------------
// FILE: crates/se_algo/src/tabulation.rs
// --------------------------------------------------------------------------------
//! Borda tabulation (deterministic, integer totals).
//!
//! Inputs:
//! - `groups`: the canonical candidate list (non-empty, caller-checked)
//! - `rankings`: one ballot per voter, each a `{GroupId -> position}` map
//!
//! Output:
//! - `BTreeMap<GroupId, BordaTally>` with an entry for **every** candidate
//!   group; groups no ballot mentions stay at `{ total_score: 0, vote_count: 0 }`.
//!
//! Rules in this layer:
//! - Reject ballots ranking a group outside the candidate set.
//! - Reject positions outside `[1, group_count]` — the weight formula is
//!   `group_count - position + 1`, so anything else corrupts totals.
//!   The whole ballot is rejected, not clamped.
//! - Ballots need not be full permutations; partial ballots score only
//!   the groups they mention.
//!
//! No RNG, no floats. Averages are derived downstream.

#![forbid(unsafe_code)]

extern crate alloc;

use alloc::collections::{BTreeMap, BTreeSet};

use se_core::{Group, GroupId, Ranking};

use crate::ScoreError;

/// Accumulated Borda totals for one group.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BordaTally {
    pub total_score: u64,
    pub vote_count: u64,
}

impl BordaTally {
    /// `total_score / vote_count` as f64; 0 for an unranked group.
    pub fn average(&self) -> f64 {
        if self.vote_count == 0 {
            0.0
        } else {
            self.total_score as f64 / self.vote_count as f64
        }
    }
}

/// Aggregate Borda scores across all ballots.
pub fn tabulate_borda(
    groups: &[Group],
    rankings: &[Ranking],
) -> Result<BTreeMap<GroupId, BordaTally>, ScoreError> {
    let group_count = groups.len() as u32;

    // Membership set for unknown-group detection.
    let known: BTreeSet<&GroupId> = groups.iter().map(|g| &g.group_id).collect();

    // Every candidate starts at zero so unranked groups still appear.
    let mut tallies: BTreeMap<GroupId, BordaTally> = groups
        .iter()
        .map(|g| (g.group_id.clone(), BordaTally::default()))
        .collect();

    for ballot in rankings {
        // Validate the whole ballot before accumulating any of it, so a
        // bad entry cannot leave a half-applied ballot behind.
        for (group, &position) in &ballot.positions {
            if !known.contains(group) {
                return Err(ScoreError::UnknownGroup {
                    voter: ballot.voter.clone(),
                    group: group.clone(),
                });
            }
            if position < 1 || position > group_count {
                return Err(ScoreError::InvalidRankPosition {
                    voter: ballot.voter.clone(),
                    group: group.clone(),
                    position,
                    group_count,
                });
            }
        }

        for (group, &position) in &ballot.positions {
            let weight = (group_count - position + 1) as u64;
            let tally = tallies.get_mut(group).expect("validated above");
            tally.total_score += weight;
            tally.vote_count += 1;
        }
    }

    Ok(tallies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;

    use proptest::prelude::*;

    fn gid(s: &str) -> GroupId {
        s.parse().expect("valid group id")
    }

    fn group(id: &str) -> Group {
        Group { group_id: gid(id), name: id.to_string() }
    }

    fn ballot(voter: &str, entries: &[(&str, u32)]) -> Ranking {
        Ranking {
            voter: voter.parse().expect("valid user id"),
            positions: entries.iter().map(|(g, p)| (gid(g), *p)).collect(),
        }
    }

    #[test]
    fn unranked_groups_stay_at_zero() {
        let groups = vec![group("a"), group("b"), group("c")];
        let ballots = vec![ballot("v@x", &[("a", 1)])];
        let tallies = tabulate_borda(&groups, &ballots).expect("tabulates");
        assert_eq!(tallies[&gid("a")], BordaTally { total_score: 3, vote_count: 1 });
        assert_eq!(tallies[&gid("b")], BordaTally::default());
        assert_eq!(tallies[&gid("c")], BordaTally::default());
    }

    #[test]
    fn position_zero_is_rejected() {
        let groups = vec![group("a"), group("b")];
        let ballots = vec![ballot("v@x", &[("a", 0), ("b", 1)])];
        let err = tabulate_borda(&groups, &ballots).unwrap_err();
        assert_eq!(
            err,
            ScoreError::InvalidRankPosition {
                voter: "v@x".parse().unwrap(),
                group: gid("a"),
                position: 0,
                group_count: 2,
            }
        );
    }

    #[test]
    fn position_past_group_count_is_rejected() {
        let groups = vec![group("a"), group("b")];
        let ballots = vec![ballot("v@x", &[("a", 3)])];
        let err = tabulate_borda(&groups, &ballots).unwrap_err();
        assert!(matches!(err, ScoreError::InvalidRankPosition { position: 3, group_count: 2, .. }));
    }

    #[test]
    fn unknown_group_is_rejected() {
        let groups = vec![group("a")];
        let ballots = vec![ballot("v@x", &[("ghost", 1)])];
        let err = tabulate_borda(&groups, &ballots).unwrap_err();
        assert!(matches!(err, ScoreError::UnknownGroup { .. }));
    }

    #[test]
    fn bad_ballot_leaves_no_partial_tally() {
        let groups = vec![group("a"), group("b")];
        // "a" would be valid, but the same ballot breaks on "b".
        let ballots = vec![ballot("v@x", &[("a", 1), ("b", 9)])];
        assert!(tabulate_borda(&groups, &ballots).is_err());
    }

    /// A single full-permutation ballot assigns exactly the weight
    /// multiset {1, 2, ..., group_count}.
    #[test]
    fn full_permutation_weight_multiset() {
        let groups: Vec<Group> = ["a", "b", "c", "d", "e"].iter().map(|g| group(g)).collect();
        let ballots = vec![ballot(
            "v@x",
            &[("c", 1), ("a", 2), ("e", 3), ("b", 4), ("d", 5)],
        )];
        let tallies = tabulate_borda(&groups, &ballots).expect("tabulates");
        let mut weights: Vec<u64> = tallies.values().map(|t| t.total_score).collect();
        weights.sort_unstable();
        assert_eq!(weights, vec![1, 2, 3, 4, 5]);
    }

    proptest! {
        /// Any full-permutation electorate: each ballot contributes the
        /// weight multiset {1..n}, so totals sum to voters * n(n+1)/2.
        #[test]
        fn permutation_totals_sum(n in 1usize..8, voters in 1usize..6, seed in any::<u64>()) {
            let names: Vec<alloc::string::String> =
                (0..n).map(|i| alloc::format!("g{i}")).collect();
            let groups: Vec<Group> = names.iter().map(|s| group(s)).collect();

            // Cheap deterministic shuffles driven by the seed.
            let mut state = seed;
            let mut ballots = Vec::new();
            for v in 0..voters {
                let mut order: Vec<usize> = (0..n).collect();
                for i in (1..n).rev() {
                    state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                    let j = (state % (i as u64 + 1)) as usize;
                    order.swap(i, j);
                }
                let entries: Vec<(GroupId, u32)> = order
                    .iter()
                    .enumerate()
                    .map(|(pos, &gix)| (gid(&names[gix]), pos as u32 + 1))
                    .collect();
                ballots.push(Ranking {
                    voter: alloc::format!("v{v}@x").parse().unwrap(),
                    positions: entries.into_iter().collect(),
                });
            }

            let tallies = tabulate_borda(&groups, &ballots).expect("tabulates");
            let total: u64 = tallies.values().map(|t| t.total_score).sum();
            let expected = (voters * n * (n + 1) / 2) as u64;
            prop_assert_eq!(total, expected);
            prop_assert!(tallies.values().all(|t| t.vote_count == voters as u64));
        }
    }
}
