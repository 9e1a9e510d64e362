//! # Manifest Parsing
//!
//! Best-effort extraction of the `version` field from a remote manifest
//! body. Parse failures are logged and absorbed; the caller only ever sees
//! an `Option`.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Version descriptor fetched from the remote manifest URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestRecord {
    /// Dot-separated version string
    pub version: String,
}

/// Parse the manifest version out of a response body, never failing
pub fn parse_version_or_none(body: &[u8]) -> Option<String> {
    match serde_json::from_slice::<ManifestRecord>(body) {
        Ok(record) => Some(record.version),
        Err(error) => {
            debug!(%error, "manifest body did not parse, treating as no version");
            None
        }
    }
}
