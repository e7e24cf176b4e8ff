//! crates/se_io/src/loader.rs
//!
//! Filesystem entry points: read a stage snapshot (or a reward-policy
//! override) from a local JSON file. Strictly offline — URL-looking
//! paths are rejected before touching the filesystem.
//!
//! The snapshot digest is computed over the **raw bytes** read from
//! disk, before any parsing, so the report footer identifies the exact
//! artifact that was scored.

#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;

use serde::Deserialize;

use se_core::RewardPolicy;

use crate::snapshot::{StageInput, StageSnapshot};
use crate::{looks_like_url_strict, try_sha256_hex, IoError};

/// A snapshot converted to scorer input, plus its byte digest.
#[derive(Debug, Clone)]
pub struct LoadedStage {
    pub input: StageInput,
    /// Lowercase SHA-256 hex of the raw snapshot file.
    pub snapshot_sha256: String,
}

/// Load and validate a stage snapshot from a local JSON file.
pub fn load_stage_snapshot(path: &Path) -> Result<LoadedStage, IoError> {
    let bytes = read_local(path)?;
    let snapshot_sha256 = try_sha256_hex(&bytes)?;
    let snapshot: StageSnapshot = serde_json::from_slice(&bytes)?;
    Ok(LoadedStage { input: snapshot.into_input()?, snapshot_sha256 })
}

/// On-disk reward-policy override: `{"shares":[...], "defaultShare": x}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PolicyFile {
    shares: Vec<f64>,
    default_share: f64,
}

/// Load a reward-policy override from a local JSON file.
pub fn load_reward_policy(path: &Path) -> Result<RewardPolicy, IoError> {
    let bytes = read_local(path)?;
    let file: PolicyFile = serde_json::from_slice(&bytes)?;
    RewardPolicy::new(file.shares, file.default_share)
        .map_err(|e| IoError::Invalid(format!("reward policy at {}: {e}", path.display())))
}

fn read_local(path: &Path) -> Result<Vec<u8>, IoError> {
    let shown = path.to_string_lossy();
    if looks_like_url_strict(&shown) {
        return Err(IoError::Path(format!("refusing URL-like path: {shown}")));
    }
    fs::read(path).map_err(|e| IoError::Path(format!("{shown}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("temp file");
        f.write_all(contents.as_bytes()).expect("write");
        f
    }

    #[test]
    fn loads_snapshot_and_digest() {
        let f = write_temp(
            r#"{
                "stage": {"stageId": "s1", "stageName": "S", "status": "voting", "reportRewardPool": 10},
                "groups": [{"groupId": "g1", "groupName": "G"}],
                "members": [],
                "rankings": [{"proposerEmail": "v@x", "rankingData": "{\"g1\":1}"}]
            }"#,
        );
        let loaded = load_stage_snapshot(f.path()).expect("loads");
        assert_eq!(loaded.input.groups.len(), 1);
        assert_eq!(loaded.input.rankings.len(), 1);
        assert_eq!(loaded.snapshot_sha256.len(), 64);
    }

    #[test]
    fn digest_tracks_bytes_not_meaning() {
        let a = write_temp(r#"{"stage":{"stageId":"s1","stageName":"S","status":"pending"},"groups":[]}"#);
        let b = write_temp(r#"{"stage":{"stageId":"s1","stageName":"S","status":"pending"},"groups":[] }"#);
        let da = load_stage_snapshot(a.path()).expect("loads").snapshot_sha256;
        let db = load_stage_snapshot(b.path()).expect("loads").snapshot_sha256;
        assert_ne!(da, db);
    }

    #[test]
    fn missing_file_is_a_path_error() {
        let err = load_stage_snapshot(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(matches!(err, IoError::Path(_)));
    }

    #[test]
    fn url_like_path_is_rejected() {
        let err = load_stage_snapshot(Path::new("https://example.com/snap.json")).unwrap_err();
        assert!(matches!(err, IoError::Path(_)));
    }

    #[test]
    fn loads_policy_override() {
        let f = write_temp(r#"{"shares": [0.5, 0.5], "defaultShare": 0.0}"#);
        let p = load_reward_policy(f.path()).expect("loads");
        assert_eq!(p.share_for(1), 0.5);
        assert_eq!(p.share_for(3), 0.0);
    }

    #[test]
    fn negative_policy_share_is_invalid() {
        let f = write_temp(r#"{"shares": [-0.5], "defaultShare": 0.05}"#);
        let err = load_reward_policy(f.path()).unwrap_err();
        assert!(matches!(err, IoError::Invalid(_)));
    }
}
