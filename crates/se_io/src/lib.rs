//! crates/se_io/src/lib.rs
//! Snapshot I/O for the settlement engine.
//!
//! - No inline implementations: the **file modules** are the single
//!   source of truth (`snapshot.rs`, `loader.rs`, `hasher.rs`).
//! - Shared error type (`IoError`) with `From` conversions used across
//!   modules.
//! - Strictly offline: inputs are local files, never URLs.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for se_io (used by snapshot/loader/hasher).
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors.
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON serialization/deserialization errors with an optional JSON Pointer.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// A ranking row's `rankingData` column did not parse as the expected
    /// `{groupId: position}` mapping. Surfaced, never silently skipped.
    #[error("malformed ranking payload from {voter}: {msg}")]
    MalformedRanking { voter: String, msg: String },

    /// Hashing-related errors (e.g., feature disabled).
    #[error("hash error: {0}")]
    Hash(String),

    /// Generic validation / invariants.
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json doesn't keep a pointer; default to root. Callers may
        // enrich this at higher layers.
        IoError::Json { pointer: "/".to_string(), msg: e.to_string() }
    }
}

/* ---------------- Public modules (single source of truth) ---------------- */

#[cfg(feature = "hash")]
pub mod hasher;
pub mod loader;
pub mod snapshot;

/// Compute SHA-256 hex of `bytes` or fail loudly when hashing is unavailable.
pub fn try_sha256_hex(bytes: &[u8]) -> Result<String, IoError> {
    #[cfg(feature = "hash")]
    {
        Ok(crate::hasher::sha256_hex(bytes))
    }
    #[cfg(not(feature = "hash"))]
    {
        let _ = bytes;
        Err(IoError::Hash("hash feature disabled".into()))
    }
}

/// Returns true if `s` looks like a URL (any `<scheme>://`, including `file://`).
/// Loading follows a strict offline posture; reject such paths early.
#[inline]
pub fn looks_like_url_strict(s: &str) -> bool {
    s.trim().contains("://")
}

pub mod prelude {
    pub use crate::{looks_like_url_strict, try_sha256_hex, IoError, IoResult};

    #[cfg(feature = "hash")]
    pub use crate::hasher;
    pub use crate::loader;
    pub use crate::snapshot;

    pub use crate::loader::{load_reward_policy, load_stage_snapshot, LoadedStage};
    pub use crate::snapshot::{StageInput, StageSnapshot};
}
