//! crates/se_io/src/snapshot.rs
//!
//! Serde models of a JSON *stage snapshot* and their conversion into the
//! core entities the scorer consumes.
//!
//! The snapshot mirrors the row shapes of the backing store (camelCase
//! column names: `stageId`, `reportRewardPool`, `proposerEmail`,
//! `rankingData`, ...). Unknown columns are tolerated — real exports
//! carry more columns than the scorer needs.
//!
//! Conversion rules:
//! - `reportRewardPool` may be null/absent → 0.
//! - Only groups with `status` absent or `"active"` enter the candidate
//!   list; input order is preserved (it breaks Borda ties downstream).
//! - Only membership rows with `isActive == 1` join a roster; a row
//!   naming a group outside the candidate list is a hard error.
//! - Only ranking rows with `status` absent or `"submitted"` are kept.
//! - `rankingData` is an embedded JSON object string, exactly as the
//!   store's TEXT column holds it; anything that does not parse as a
//!   `{groupId: position}` map is a `MalformedRanking` error naming the
//!   voter — never silently skipped.
//! - Several submitted rankings from one voter collapse to the most
//!   recent by `createdTime` (earliest row wins an exact tie). The
//!   scorer itself never deduplicates.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use se_core::{Group, GroupId, Member, Ranking, Stage, StageStatus, UserId};

use crate::IoError;

/* --------------------------------- Row models --------------------------------- */

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRow {
    pub stage_id: String,
    pub stage_name: String,
    pub status: String,
    #[serde(default)]
    pub report_reward_pool: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRow {
    pub group_id: String,
    pub group_name: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRow {
    pub group_id: String,
    pub user_email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: u8,
}

fn default_active() -> u8 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRow {
    pub proposer_email: String,
    /// JSON object string, e.g. `"{\"grp_a\":1,\"grp_b\":2}"`.
    pub ranking_data: String,
    #[serde(default)]
    pub created_time: i64,
    #[serde(default)]
    pub status: Option<String>,
}

/// Raw snapshot as exported from the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSnapshot {
    pub stage: StageRow,
    pub groups: Vec<GroupRow>,
    #[serde(default)]
    pub members: Vec<MemberRow>,
    #[serde(default)]
    pub rankings: Vec<RankingRow>,
}

/* ------------------------------- Scorer input ------------------------------- */

/// Validated, typed input ready for `se_algo::score_stage`.
#[derive(Debug, Clone)]
pub struct StageInput {
    pub stage: Stage,
    pub groups: Vec<Group>,
    pub memberships: BTreeMap<GroupId, Vec<Member>>,
    pub rankings: Vec<Ranking>,
}

impl StageSnapshot {
    /// Convert raw rows into typed scorer input, applying the filter and
    /// dedup rules documented at module level.
    pub fn into_input(self) -> Result<StageInput, IoError> {
        let stage = convert_stage(&self.stage)?;
        let groups = convert_groups(&self.groups)?;
        let memberships = convert_members(&self.members, &groups)?;
        let rankings = convert_rankings(&self.rankings)?;
        Ok(StageInput { stage, groups, memberships, rankings })
    }
}

fn convert_stage(row: &StageRow) -> Result<Stage, IoError> {
    let stage_id = row
        .stage_id
        .parse()
        .map_err(|e| IoError::Invalid(format!("stageId {:?}: {e}", row.stage_id)))?;
    let status: StageStatus = row
        .status
        .parse()
        .map_err(|e| IoError::Invalid(format!("stage status {:?}: {e}", row.status)))?;
    let reward_pool = row.report_reward_pool.unwrap_or(0.0);
    Ok(Stage { stage_id, name: row.stage_name.clone(), status, reward_pool })
}

fn convert_groups(rows: &[GroupRow]) -> Result<Vec<Group>, IoError> {
    let mut groups = Vec::new();
    for row in rows {
        if let Some(status) = &row.status {
            if status != "active" {
                continue;
            }
        }
        let group_id: GroupId = row
            .group_id
            .parse()
            .map_err(|e| IoError::Invalid(format!("groupId {:?}: {e}", row.group_id)))?;
        if groups.iter().any(|g: &Group| g.group_id == group_id) {
            return Err(IoError::Invalid(format!("duplicate groupId {group_id}")));
        }
        groups.push(Group { group_id, name: row.group_name.clone() });
    }
    Ok(groups)
}

fn convert_members(
    rows: &[MemberRow],
    groups: &[Group],
) -> Result<BTreeMap<GroupId, Vec<Member>>, IoError> {
    let mut memberships: BTreeMap<GroupId, Vec<Member>> =
        groups.iter().map(|g| (g.group_id.clone(), Vec::new())).collect();

    for row in rows {
        if row.is_active == 0 {
            continue;
        }
        let group_id: GroupId = row
            .group_id
            .parse()
            .map_err(|e| IoError::Invalid(format!("member groupId {:?}: {e}", row.group_id)))?;
        let user_id: UserId = row
            .user_email
            .parse()
            .map_err(|e| IoError::Invalid(format!("userEmail {:?}: {e}", row.user_email)))?;
        let roster = memberships.get_mut(&group_id).ok_or_else(|| {
            IoError::Invalid(format!(
                "membership row for {} names group {} outside the candidate list",
                row.user_email, row.group_id
            ))
        })?;
        let display_name = row
            .display_name
            .clone()
            .unwrap_or_else(|| row.user_email.clone());
        roster.push(Member { user_id, display_name });
    }
    Ok(memberships)
}

fn convert_rankings(rows: &[RankingRow]) -> Result<Vec<Ranking>, IoError> {
    // Latest submitted row per voter (strictly-greater createdTime replaces).
    let mut latest: BTreeMap<String, &RankingRow> = BTreeMap::new();
    for row in rows {
        if let Some(status) = &row.status {
            if status != "submitted" {
                continue;
            }
        }
        match latest.get(&row.proposer_email) {
            Some(prev) if row.created_time <= prev.created_time => {}
            _ => {
                latest.insert(row.proposer_email.clone(), row);
            }
        }
    }

    // BTreeMap iteration gives a deterministic voter order.
    let mut rankings = Vec::with_capacity(latest.len());
    for row in latest.values() {
        rankings.push(parse_ranking_row(row)?);
    }
    Ok(rankings)
}

/// Parse one row's `rankingData` JSON string into a typed ballot.
fn parse_ranking_row(row: &RankingRow) -> Result<Ranking, IoError> {
    let voter: UserId = row.proposer_email.parse().map_err(|e| {
        IoError::Invalid(format!("proposerEmail {:?}: {e}", row.proposer_email))
    })?;

    let malformed = |msg: String| IoError::MalformedRanking {
        voter: row.proposer_email.clone(),
        msg,
    };

    let value: Value = serde_json::from_str(&row.ranking_data)
        .map_err(|e| malformed(e.to_string()))?;
    let map = value
        .as_object()
        .ok_or_else(|| malformed(format!("expected a JSON object, got {value}")))?;

    let mut positions = BTreeMap::new();
    for (key, pos) in map {
        let group_id: GroupId = key
            .parse()
            .map_err(|e| malformed(format!("group key {key:?}: {e}")))?;
        let position = pos
            .as_u64()
            .and_then(|p| u32::try_from(p).ok())
            .ok_or_else(|| malformed(format!("position for {key:?} is not a small non-negative integer: {pos}")))?;
        positions.insert(group_id, position);
    }

    Ok(Ranking { voter, positions })
}
