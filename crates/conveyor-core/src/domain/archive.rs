//! Archive records: write-once rows recording a terminal message outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Terminal outcome recorded with an archived envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveStatus {
    #[default]
    Success,
    Poison,
}

impl ArchiveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveStatus::Success => "success",
            ArchiveStatus::Poison => "poison",
        }
    }
}

impl std::fmt::Display for ArchiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One archived envelope.
///
/// Entries are write-once: created exactly once per terminal outcome, never
/// updated or deleted. Both keys are derived at construction time:
/// - `partition_key` is a coarse UTC year-month bucket, used purely for
///   storage partitioning.
/// - `row_key` is a ULID string, time-ordered with a random suffix, so two
///   entries archived in the same instant never collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub partition_key: String,
    pub row_key: String,
    /// The serialized envelope that was archived.
    pub message: String,
    pub status: ArchiveStatus,
    pub archived_at: DateTime<Utc>,
}

impl ArchiveEntry {
    pub fn new(message: impl Into<String>, status: ArchiveStatus) -> Self {
        let now = Utc::now();
        Self {
            partition_key: now.format("%Y-%m").to_string(),
            row_key: Ulid::new().to_string(),
            message: message.into(),
            status,
            archived_at: now,
        }
    }
}
