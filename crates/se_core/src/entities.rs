//! Stage / group / member / ranking entities.
//!
//! All of these are read from an external store at computation start and
//! are immutable from the scorer's perspective. The scorer never writes
//! them back; persisting outcomes is the caller's job.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use crate::errors::CoreError;
use crate::tokens::{GroupId, StageId, UserId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stage lifecycle labels as the backing store spells them (lowercase).
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StageStatus {
    Pending,
    Voting,
    Settling,
    Completed,
}

impl StageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Pending => "pending",
            StageStatus::Voting => "voting",
            StageStatus::Settling => "settling",
            StageStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageStatus {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(StageStatus::Pending),
            "voting" => Ok(StageStatus::Voting),
            "settling" => Ok(StageStatus::Settling),
            "completed" => Ok(StageStatus::Completed),
            _ => Err(CoreError::InvalidStatus),
        }
    }
}

/// One scoring round of a project. `reward_pool` is non-negative and may
/// be zero (an unset pool loads as zero); a zero pool still produces a
/// ranking, just with no points distributed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stage {
    pub stage_id: StageId,
    pub name: String,
    pub status: StageStatus,
    pub reward_pool: f64,
}

/// A competing entity within a stage. The order groups are listed in is
/// canonical: equal Borda totals resolve in favor of the first-listed
/// group, so callers must supply a deterministic order.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Group {
    pub group_id: GroupId,
    pub name: String,
}

/// A user on exactly one group's roster for the purposes of a single
/// settlement computation.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Member {
    pub user_id: UserId,
    pub display_name: String,
}

/// One voter's submitted ordering over groups: position 1 = best.
///
/// The scorer assumes one ranking per voter per stage; when the raw
/// store holds several submissions from the same voter, the I/O layer
/// keeps the most recent before handing rankings to the scorer.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ranking {
    pub voter: UserId,
    pub positions: BTreeMap<GroupId, u32>,
}
