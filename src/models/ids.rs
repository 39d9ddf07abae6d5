//! Deterministic dataset fingerprints using SHA256 hashing.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Identifies one version of the draw history by content hash.
///
/// Two loads of the same payload yield the same id, so clients can tell
/// whether the statistics they hold are stale.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetId(String);

impl DatasetId {
    /// Fingerprint a raw payload.
    /// Uses SHA256 and takes the first 16 characters for brevity.
    pub fn from_payload(payload: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(payload);
        let hash = hex::encode(hasher.finalize());
        Self(hash[..16].to_string())
    }

    /// Fixed id for the built-in offline statistics.
    pub fn offline() -> Self {
        Self("offline".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DatasetId({})", self.0)
    }
}
