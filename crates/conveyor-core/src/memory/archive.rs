//! In-memory archive store.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ArchiveEntry;
use crate::ports::{ArchiveError, ArchiveStore};

/// Single-process [`ArchiveStore`] that keeps entries in append order.
///
/// State lives behind its own mutex, so one instance per test gives full
/// isolation. `entries` returns a snapshot for assertions.
#[derive(Debug, Default)]
pub struct InMemoryArchive {
    entries: Mutex<Vec<ArchiveEntry>>,
}

impl InMemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far, oldest first.
    pub async fn entries(&self) -> Vec<ArchiveEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl ArchiveStore for InMemoryArchive {
    async fn append(&self, entry: ArchiveEntry) -> Result<(), ArchiveError> {
        self.entries.lock().await.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArchiveStatus;

    #[tokio::test]
    async fn append_accumulates_in_order() {
        let archive = InMemoryArchive::new();
        assert!(archive.is_empty().await);

        archive
            .append(ArchiveEntry::new("first", ArchiveStatus::Success))
            .await
            .unwrap();
        archive
            .append(ArchiveEntry::new("second", ArchiveStatus::Poison))
            .await
            .unwrap();

        let entries = archive.entries().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[0].status, ArchiveStatus::Success);
        assert_eq!(entries[1].message, "second");
        assert_eq!(entries[1].status, ArchiveStatus::Poison);
    }

    #[tokio::test]
    async fn snapshots_are_independent_of_later_appends() {
        let archive = InMemoryArchive::new();
        archive
            .append(ArchiveEntry::new("only", ArchiveStatus::Success))
            .await
            .unwrap();

        let before = archive.entries().await;
        archive
            .append(ArchiveEntry::new("later", ArchiveStatus::Success))
            .await
            .unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(archive.len().await, 2);
    }
}
