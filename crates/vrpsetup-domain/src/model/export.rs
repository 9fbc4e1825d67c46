//! Revocable reference to exported bytes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CSV_MEDIA_TYPE: &str = "text/csv;charset=utf-8";

/// Handle to a published export, valid until revoked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportArtifact {
    /// Opaque reference, e.g. `blob:<uuid>`
    pub url: String,
    pub byte_len: usize,
    pub media_type: String,
    pub created_at: DateTime<Utc>,
}
