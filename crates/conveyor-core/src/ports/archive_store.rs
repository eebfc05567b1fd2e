//! Archive store port: the append-only record store seam.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ArchiveEntry;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive write failed: {0}")]
    WriteFailed(String),
}

/// Append-only archive of terminal message outcomes.
///
/// There is no update or delete operation: entries are write-once, and
/// concurrent appends for different messages are independent (every entry
/// carries its own collision-free row key).
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    async fn append(&self, entry: ArchiveEntry) -> Result<(), ArchiveError>;
}
