//! Sync checkpoint persistence.
//!
//! The checkpoint records where the changelog was last consumed from.  It is
//! advanced to the pass's start time only after the pass completes, so an
//! aborted pass replays its window on the next invocation (at-least-once).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::BridgeResult;

/// Persisted sync position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncCheckpoint {
    /// Start time of the last completed pass.  `None` means no pass has ever
    /// completed and the next one reads the changelog from the beginning.
    pub last_sync: Option<DateTime<Utc>>,
}

impl SyncCheckpoint {
    #[must_use]
    pub fn at(last_sync: DateTime<Utc>) -> Self {
        Self {
            last_sync: Some(last_sync),
        }
    }
}

/// Storage seam for the checkpoint.
///
/// Implementations decide durability; failures surface as
/// [`BridgeError::Checkpoint`](crate::error::BridgeError::Checkpoint).
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Load the current checkpoint.  A store with no prior state returns
    /// the default (empty) checkpoint.
    async fn load(&self) -> BridgeResult<SyncCheckpoint>;

    /// Persist a new checkpoint, replacing the previous one.
    async fn save(&self, checkpoint: &SyncCheckpoint) -> BridgeResult<()>;
}

/// Process-local checkpoint store.
///
/// State does not survive a restart; a restarted bridge falls back to a full
/// resync, which is safe because sharing-state writes are idempotent.
#[derive(Debug, Default)]
pub struct InMemoryCheckpointStore {
    inner: RwLock<SyncCheckpoint>,
}

impl InMemoryCheckpointStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn load(&self) -> BridgeResult<SyncCheckpoint> {
        Ok(*self.inner.read().await)
    }

    async fn save(&self, checkpoint: &SyncCheckpoint) -> BridgeResult<()> {
        *self.inner.write().await = *checkpoint;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_store_loads_empty_checkpoint() {
        let store = InMemoryCheckpointStore::new();
        let checkpoint = store.load().await.unwrap();
        assert!(checkpoint.last_sync.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let store = InMemoryCheckpointStore::new();
        let stamp = Utc::now();
        store.save(&SyncCheckpoint::at(stamp)).await.unwrap();
        assert_eq!(store.load().await.unwrap().last_sync, Some(stamp));
    }

    #[tokio::test]
    async fn test_save_replaces_previous_checkpoint() {
        let store = InMemoryCheckpointStore::new();
        let first = Utc::now();
        let second = first + chrono::Duration::seconds(60);
        store.save(&SyncCheckpoint::at(first)).await.unwrap();
        store.save(&SyncCheckpoint::at(second)).await.unwrap();
        assert_eq!(store.load().await.unwrap().last_sync, Some(second));
    }
}
