// crates/se_algo/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

//! se_algo — Borda tabulation and tiered reward distribution.
//!
//! One public entry point, `score_stage`, turns a stage's voting data
//! into an ordered list of per-group results plus a settlement summary.
//! The computation is pure: no I/O, no clock, no RNG, and identical
//! inputs always produce identical output. Persisting the outcome (or
//! guarding against double settlement of a stage) is the caller's job.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use se_core::{Group, GroupId, Member, Ranking, RewardPolicy, UserId};

// File modules (actual implementations)
pub mod distribution;
pub mod tabulation;

pub use tabulation::{tabulate_borda, BordaTally};

/// Scoring errors. None of these are retryable: the computation is
/// deterministic, so a retry with the same input reproduces the error.
#[derive(Clone, Debug, PartialEq)]
pub enum ScoreError {
    /// No candidate groups to rank.
    EmptyGroupSet,
    /// No ballots to aggregate.
    NoVotesAvailable,
    /// Reward pool was negative or non-finite.
    InvalidRewardPool(f64),
    /// A ballot ranked a group that is not in the candidate set.
    UnknownGroup { voter: UserId, group: GroupId },
    /// A ballot entry used a position outside `[1, group_count]`.
    /// The whole ballot is rejected, never clamped: weights are
    /// `group_count - position + 1`, so out-of-range positions would
    /// silently corrupt scores.
    InvalidRankPosition {
        voter: UserId,
        group: GroupId,
        position: u32,
        group_count: u32,
    },
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::EmptyGroupSet => write!(f, "no groups to rank"),
            ScoreError::NoVotesAvailable => write!(f, "no rankings submitted"),
            ScoreError::InvalidRewardPool(p) => {
                write!(f, "reward pool must be a non-negative number (got {p})")
            }
            ScoreError::UnknownGroup { voter, group } => {
                write!(f, "ballot from {voter} ranks unknown group {group}")
            }
            ScoreError::InvalidRankPosition { voter, group, position, group_count } => write!(
                f,
                "ballot from {voter} places {group} at position {position}, outside 1..={group_count}"
            ),
        }
    }
}

/// One member's point delta from a settlement.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberAward {
    pub user_id: UserId,
    pub display_name: String,
    pub points: f64,
}

/// Per-group settlement result, one entry per candidate group.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupResult {
    pub group_id: GroupId,
    pub group_name: String,
    /// Dense 1-based final position; ties resolve to the first-listed group.
    pub rank: u32,
    pub total_score: u64,
    pub vote_count: u64,
    /// `total_score / vote_count`, 0 when the group received no votes.
    pub average_score: f64,
    /// Share of the pool the policy table assigns to `rank`.
    pub reward_share: f64,
    pub allocated_points: f64,
    /// Even split of `allocated_points` across the roster; 0 for an
    /// empty roster (no division by zero).
    pub per_member_points: f64,
    pub awards: Vec<MemberAward>,
}

/// Audit totals for one settlement run.
#[derive(Clone, Debug, PartialEq)]
pub struct SettlementSummary {
    pub ballot_count: u64,
    pub group_count: u64,
    /// Roster members across all candidate groups.
    pub participant_count: u64,
    /// Sum of allocated points. The default policy table is not
    /// normalized, so this may be under or over the pool depending on
    /// the group count.
    pub total_allocated: f64,
}

/// Settlement outcome: results ordered by final rank, plus summary.
#[derive(Clone, Debug, PartialEq)]
pub struct StageOutcome {
    pub results: Vec<GroupResult>,
    pub summary: SettlementSummary,
}

/// Score one stage: Borda-aggregate `rankings` over `groups`, order the
/// groups, and distribute `reward_pool` by the policy table.
///
/// `groups` order is canonical and breaks Borda ties (first-listed
/// wins). `memberships` may omit a group or list an empty roster; that
/// group's per-member allocation is 0.
pub fn score_stage(
    reward_pool: f64,
    groups: &[Group],
    memberships: &BTreeMap<GroupId, Vec<Member>>,
    rankings: &[Ranking],
    policy: &RewardPolicy,
) -> Result<StageOutcome, ScoreError> {
    if groups.is_empty() {
        return Err(ScoreError::EmptyGroupSet);
    }
    if rankings.is_empty() {
        return Err(ScoreError::NoVotesAvailable);
    }
    if !reward_pool.is_finite() || reward_pool < 0.0 {
        return Err(ScoreError::InvalidRewardPool(reward_pool));
    }

    let tallies = tabulation::tabulate_borda(groups, rankings)?;
    Ok(distribution::distribute_rewards(
        reward_pool,
        groups,
        memberships,
        &tallies,
        rankings.len() as u64,
        policy,
    ))
}
