// --------------------------------------------------------------------------------
// FILE: crates/se_algo/src/distribution.rs
// --------------------------------------------------------------------------------
//! Final ordering and tiered reward distribution.
//!
//! Contract:
//! - Order candidates by Borda `total_score` descending; the sort is
//!   **stable** over the canonical input order, so equal totals resolve
//!   to the first-listed group. Ranks are dense (1, 2, 3, ...).
//! - Each rank's pool share comes from the `RewardPolicy` table;
//!   `allocated = pool * share`. The default table is not normalized, so
//!   the summed allocation may undershoot (< 4 groups) or overshoot
//!   (> 5 groups) the pool. That is preserved policy behavior.
//! - Per-member points are an even split over the roster; an empty or
//!   missing roster yields 0 per member (allocation still recorded).
//!
//! Determinism: no RNG, no policy decisions here beyond the table lookup.

#![forbid(unsafe_code)]

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use se_core::{Group, GroupId, Member, RewardPolicy};

use crate::tabulation::BordaTally;
use crate::{GroupResult, MemberAward, SettlementSummary, StageOutcome};

/// Build the ordered results and audit summary from accumulated tallies.
///
/// `tallies` must hold an entry for every group in `groups` (guaranteed
/// by `tabulate_borda`); a missing entry counts as zero.
pub fn distribute_rewards(
    reward_pool: f64,
    groups: &[Group],
    memberships: &BTreeMap<GroupId, Vec<Member>>,
    tallies: &BTreeMap<GroupId, BordaTally>,
    ballot_count: u64,
    policy: &RewardPolicy,
) -> StageOutcome {
    // Stable sort over canonical input order: ties keep input position.
    let mut ordered: Vec<&Group> = groups.iter().collect();
    ordered.sort_by(|a, b| {
        let ta = tallies.get(&a.group_id).copied().unwrap_or_default();
        let tb = tallies.get(&b.group_id).copied().unwrap_or_default();
        tb.total_score.cmp(&ta.total_score)
    });

    let mut participant_count: u64 = 0;
    let mut total_allocated: f64 = 0.0;

    let results: Vec<GroupResult> = ordered
        .iter()
        .enumerate()
        .map(|(ix, g)| {
            let rank = ix as u32 + 1;
            let tally = tallies.get(&g.group_id).copied().unwrap_or_default();
            let share = policy.share_for(rank);
            let allocated = reward_pool * share;

            let roster: &[Member] = memberships
                .get(&g.group_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let per_member = if roster.is_empty() {
                0.0
            } else {
                allocated / roster.len() as f64
            };

            participant_count += roster.len() as u64;
            total_allocated += allocated;

            let awards: Vec<MemberAward> = roster
                .iter()
                .map(|m| MemberAward {
                    user_id: m.user_id.clone(),
                    display_name: m.display_name.clone(),
                    points: per_member,
                })
                .collect();

            GroupResult {
                group_id: g.group_id.clone(),
                group_name: g.name.clone(),
                rank,
                total_score: tally.total_score,
                vote_count: tally.vote_count,
                average_score: tally.average(),
                reward_share: share,
                allocated_points: allocated,
                per_member_points: per_member,
                awards,
            }
        })
        .collect();

    StageOutcome {
        results,
        summary: SettlementSummary {
            ballot_count,
            group_count: groups.len() as u64,
            participant_count,
            total_allocated,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn gid(s: &str) -> GroupId {
        s.parse().expect("valid group id")
    }

    fn group(id: &str) -> Group {
        Group { group_id: gid(id), name: id.to_string() }
    }

    fn tally(total: u64, votes: u64) -> BordaTally {
        BordaTally { total_score: total, vote_count: votes }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn deep_field_gets_flat_share() {
        // 6 groups: ranks 5 and 6 each take the 5% flat share, so the
        // summed allocation overshoots the pool (110%).
        let groups: Vec<Group> = ["a", "b", "c", "d", "e", "f"].iter().map(|g| group(g)).collect();
        let tallies: BTreeMap<GroupId, BordaTally> = groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.group_id.clone(), tally(60 - i as u64 * 10, 3)))
            .collect();

        let out = distribute_rewards(
            200.0,
            &groups,
            &BTreeMap::new(),
            &tallies,
            3,
            &RewardPolicy::default(),
        );

        let shares: Vec<f64> = out.results.iter().map(|r| r.reward_share).collect();
        assert_eq!(shares, vec![0.40, 0.30, 0.20, 0.10, 0.05, 0.05]);
        assert!(close(out.summary.total_allocated, 220.0));
    }

    #[test]
    fn missing_tally_entry_counts_as_zero() {
        let groups = vec![group("a"), group("b")];
        let tallies: BTreeMap<GroupId, BordaTally> =
            [(gid("a"), tally(5, 2))].into_iter().collect();
        let out = distribute_rewards(10.0, &groups, &BTreeMap::new(), &tallies, 2, &RewardPolicy::default());
        assert_eq!(out.results[1].group_id.as_str(), "b");
        assert_eq!(out.results[1].total_score, 0);
        assert!(close(out.results[1].average_score, 0.0));
    }

    #[test]
    fn all_zero_totals_keep_input_order() {
        let groups = vec![group("m"), group("k"), group("z")];
        let tallies: BTreeMap<GroupId, BordaTally> = groups
            .iter()
            .map(|g| (g.group_id.clone(), BordaTally::default()))
            .collect();
        let out = distribute_rewards(50.0, &groups, &BTreeMap::new(), &tallies, 1, &RewardPolicy::default());
        let order: Vec<&str> = out.results.iter().map(|r| r.group_id.as_str()).collect();
        assert_eq!(order, vec!["m", "k", "z"]);
    }

    #[test]
    fn custom_policy_table_is_honored() {
        let groups = vec![group("a"), group("b")];
        let tallies: BTreeMap<GroupId, BordaTally> = [
            (gid("a"), tally(4, 2)),
            (gid("b"), tally(2, 2)),
        ]
        .into_iter()
        .collect();
        let policy = RewardPolicy::new(vec![0.5], 0.25).expect("valid policy");
        let out = distribute_rewards(100.0, &groups, &BTreeMap::new(), &tallies, 2, &policy);
        assert!(close(out.results[0].allocated_points, 50.0));
        assert!(close(out.results[1].allocated_points, 25.0));
    }
}
