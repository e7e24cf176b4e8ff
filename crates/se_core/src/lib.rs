//! se_core — Core types for the settlement engine.
//!
//! This crate is **I/O-free**. It defines the stable types shared by the
//! rest of the workspace (`se_io`, `se_algo`, `se_cli`):
//!
//! - ID tokens: `StageId`, `GroupId`, `UserId`
//! - Entities: `Stage`, `StageStatus`, `Group`, `Member`, `Ranking`
//! - Reward-share policy: `RewardPolicy`
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod entities;
pub mod policy;
pub mod tokens;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidToken,
        InvalidStatus,
        InvalidShare,
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidToken => write!(f, "invalid token"),
                CoreError::InvalidStatus => write!(f, "invalid stage status"),
                CoreError::InvalidShare => write!(f, "invalid reward share"),
            }
        }
    }
}

// Convenience re-exports (downstream crates import these from the root)
pub use entities::{Group, Member, Ranking, Stage, StageStatus};
pub use errors::CoreError;
pub use policy::RewardPolicy;
pub use tokens::{GroupId, StageId, UserId};
