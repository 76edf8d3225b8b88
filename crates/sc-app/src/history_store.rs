//! Shared clip history mirrored to the key/value store.

use std::sync::Arc;

use sc_core::ports::{KeyValueStorePort, NotifierPort, StorageError};
use sc_core::{ClipHistory, Notice};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

/// Storage key holding the JSON array of clips.
pub const HISTORY_STORAGE_KEY: &str = "syncclip_history";

/// The single owner of the in-memory [`ClipHistory`].
///
/// Every change to the clip list goes through [`HistoryStore::update`], which
/// trims the list to capacity and writes it back to storage before releasing
/// the lock, so writes land in the order the changes were made. A failed
/// write is logged and surfaced as a notice; it never fails the caller.
pub struct HistoryStore {
    history: Mutex<ClipHistory>,
    storage: Arc<dyn KeyValueStorePort>,
    notifier: Arc<dyn NotifierPort>,
    max_items: usize,
}

impl HistoryStore {
    pub fn new(
        storage: Arc<dyn KeyValueStorePort>,
        notifier: Arc<dyn NotifierPort>,
        max_items: usize,
    ) -> Self {
        Self {
            history: Mutex::new(ClipHistory::new()),
            storage,
            notifier,
            max_items: max_items.max(1),
        }
    }

    pub async fn snapshot(&self) -> ClipHistory {
        self.history.lock().await.clone()
    }

    pub async fn read<R>(&self, f: impl FnOnce(&ClipHistory) -> R) -> R {
        let history = self.history.lock().await;
        f(&history)
    }

    /// Applies `f` and persists the list if it changed.
    pub async fn update<R>(&self, f: impl FnOnce(&mut ClipHistory) -> R) -> R {
        let mut history = self.history.lock().await;
        let before = history.revision();
        let out = f(&mut history);

        if history.revision() != before {
            let dropped = history.enforce_capacity(self.max_items);
            if !dropped.is_empty() {
                debug!(
                    dropped = dropped.len(),
                    max_items = self.max_items,
                    "Trimmed clip history to capacity"
                );
            }
            self.persist(&history).await;
        }
        out
    }

    /// Reads the stored value without touching the in-memory history.
    pub async fn load_raw(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(HISTORY_STORAGE_KEY).await
    }

    /// Swaps in a freshly loaded history.
    pub async fn replace(&self, replacement: ClipHistory, persist: bool) {
        let mut history = self.history.lock().await;
        *history = replacement;
        if persist {
            self.persist(&history).await;
        }
    }

    async fn persist(&self, history: &ClipHistory) {
        let json = match serde_json::to_string(history.items()) {
            Ok(json) => json,
            Err(err) => {
                error!(error = %err, "Failed to serialize clip history");
                return;
            }
        };

        match self.storage.set(HISTORY_STORAGE_KEY, &json).await {
            Ok(()) => debug!(clips = history.len(), bytes = json.len(), "Clip history saved"),
            Err(StorageError::QuotaExceeded { required, limit }) => {
                warn!(required, limit, "Clip history exceeds the storage quota");
                self.notifier.notify(Notice::StorageFull);
            }
            Err(err) => {
                error!(error = %err, "Failed to save clip history");
                self.notifier
                    .notify(Notice::Error(format!("Failed to save history: {err}")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{remote_clip, MemoryStore, RecordingNotifier};
    use sc_core::Clip;

    fn store(storage: Arc<MemoryStore>, notifier: Arc<RecordingNotifier>, max: usize) -> HistoryStore {
        HistoryStore::new(storage, notifier, max)
    }

    #[tokio::test]
    async fn update_persists_only_when_the_list_changes() {
        let storage = Arc::new(MemoryStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let history = store(storage.clone(), notifier, 10);

        history
            .update(|h| h.insert_remote(remote_clip("a", "alpha")))
            .await;
        assert_eq!(storage.writes(), 1);

        history.update(|h| h.clear_selection()).await;
        assert_eq!(storage.writes(), 1);

        let saved: Vec<Clip> = serde_json::from_str(&storage.value(HISTORY_STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id.as_str(), "a");
    }

    #[tokio::test]
    async fn empty_history_is_still_written() {
        let storage = Arc::new(MemoryStore::default());
        let history = store(storage.clone(), Arc::new(RecordingNotifier::default()), 10);

        history
            .update(|h| h.insert_remote(remote_clip("a", "alpha")))
            .await;
        history.update(|h| h.remove(&"a".into())).await;

        assert_eq!(storage.value(HISTORY_STORAGE_KEY).as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn capacity_is_enforced_on_update() {
        let storage = Arc::new(MemoryStore::default());
        let history = store(storage, Arc::new(RecordingNotifier::default()), 2);

        for id in ["a", "b", "c"] {
            history.update(|h| h.insert_remote(remote_clip(id, id))).await;
        }

        let ids: Vec<String> = history
            .read(|h| h.items().iter().map(|c| c.id.to_string()).collect())
            .await;
        assert_eq!(ids, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn quota_failure_becomes_a_storage_full_notice() {
        let storage = Arc::new(MemoryStore::with_quota(8));
        let notifier = Arc::new(RecordingNotifier::default());
        let history = store(storage.clone(), notifier.clone(), 10);

        history
            .update(|h| h.insert_remote(remote_clip("a", "far too long for the quota")))
            .await;

        assert_eq!(notifier.notices(), vec![Notice::StorageFull]);
        assert_eq!(storage.value(HISTORY_STORAGE_KEY), None);
        // the in-memory history keeps the clip
        assert_eq!(history.read(|h| h.len()).await, 1);
    }

    #[tokio::test]
    async fn zero_capacity_still_keeps_the_newest_clip() {
        let storage = Arc::new(MemoryStore::default());
        let history = store(storage, Arc::new(RecordingNotifier::default()), 0);

        history.update(|h| h.insert_remote(remote_clip("a", "alpha"))).await;
        history.update(|h| h.insert_remote(remote_clip("b", "beta"))).await;

        let ids: Vec<String> = history
            .read(|h| h.items().iter().map(|c| c.id.to_string()).collect())
            .await;
        assert_eq!(ids, vec!["b"]);
    }
}
