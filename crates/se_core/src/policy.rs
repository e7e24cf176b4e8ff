//! Reward-share policy table.
//!
//! The distribution table is policy, not a derived computation: an
//! ordered list of shares for the top ranks plus a flat share for every
//! rank beyond the table. The default (40/30/20/10, then 5% flat) is
//! deliberately **not** normalized — with three ranked groups only 90%
//! of the pool is distributed, with six or more the shares exceed 100%.
//! Callers that need a renormalized table supply their own.

use alloc::vec::Vec;

use crate::errors::CoreError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shares for the default table: 1st..4th place.
const DEFAULT_TOP_SHARES: [f64; 4] = [0.40, 0.30, 0.20, 0.10];

/// Flat share for every rank past the table.
const DEFAULT_FLAT_SHARE: f64 = 0.05;

/// Ordered rank-share table. `shares[0]` is 1st place; any rank past the
/// end of `shares` receives `default_share`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RewardPolicy {
    pub shares: Vec<f64>,
    pub default_share: f64,
}

impl RewardPolicy {
    /// Build a policy, rejecting non-finite or negative shares.
    pub fn new(shares: Vec<f64>, default_share: f64) -> Result<Self, CoreError> {
        if !default_share.is_finite() || default_share < 0.0 {
            return Err(CoreError::InvalidShare);
        }
        for &s in &shares {
            if !s.is_finite() || s < 0.0 {
                return Err(CoreError::InvalidShare);
            }
        }
        Ok(Self { shares, default_share })
    }

    /// Share of the pool for a 1-based rank.
    pub fn share_for(&self, rank: u32) -> f64 {
        debug_assert!(rank >= 1, "ranks are 1-based");
        let ix = (rank as usize).saturating_sub(1);
        self.shares.get(ix).copied().unwrap_or(self.default_share)
    }

    /// Sum of shares actually used when `group_count` groups are ranked.
    /// Exposed so the non-normalized-table property stays visible and
    /// testable rather than an accidental artifact.
    pub fn used_total(&self, group_count: usize) -> f64 {
        (1..=group_count as u32).map(|r| self.share_for(r)).sum()
    }
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            shares: DEFAULT_TOP_SHARES.to_vec(),
            default_share: DEFAULT_FLAT_SHARE,
        }
    }
}
