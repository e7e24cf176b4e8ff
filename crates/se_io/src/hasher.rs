//! crates/se_io/src/hasher.rs
//!
//! SHA-256 digests over raw snapshot bytes. Hex digests are **lowercase**.
//! The digest goes into the report footer so a reviewer can tie a
//! settlement report back to the exact snapshot it was computed from.

#![forbid(unsafe_code)]

use sha2::{Digest, Sha256};

/// SHA-256 of raw bytes as lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}
