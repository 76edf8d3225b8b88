use std::sync::Arc;

use anyhow::{Context, Result};
use sc_core::ports::{ClockPort, StorageError};
use sc_core::{Clip, ClipHistory};
use tracing::{error, info, info_span, Instrument};

use crate::history_store::HistoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Clips restored from storage.
    Restored(usize),
    /// Nothing stored yet; the welcome clip was added.
    Seeded,
    /// The stored value could not be decoded; starting empty.
    Corrupt,
}

/// Restores the clip history at startup.
pub struct LoadHistory {
    history: Arc<HistoryStore>,
    clock: Arc<dyn ClockPort>,
}

impl LoadHistory {
    pub fn new(history: Arc<HistoryStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { history, clock }
    }

    pub async fn execute(&self) -> Result<LoadOutcome> {
        let span = info_span!("usecase.history.load.execute");

        async move {
            let now = self.clock.now_ms();
            let raw = match self.history.load_raw().await {
                Ok(raw) => raw,
                Err(StorageError::Corrupt(reason)) => {
                    error!(reason = %reason, "Stored clip history is unreadable, starting empty");
                    self.history.replace(ClipHistory::new(), false).await;
                    return Ok(LoadOutcome::Corrupt);
                }
                Err(err) => return Err(err).context("failed to read clip history from storage"),
            };

            let Some(raw) = raw else {
                info!("No stored history, seeding welcome clip");
                self.history.replace(ClipHistory::seeded(now), true).await;
                return Ok(LoadOutcome::Seeded);
            };

            let items: Vec<Clip> = match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(err) => {
                    error!(error = %err, "Stored clip history is not valid JSON, starting empty");
                    self.history.replace(ClipHistory::new(), false).await;
                    return Ok(LoadOutcome::Corrupt);
                }
            };

            let mut history = ClipHistory::from_items(items);
            let expired = history.sweep_expired(now);
            let restored = history.len();
            self.history.replace(history, !expired.is_empty()).await;

            info!(restored, expired = expired.len(), "Clip history restored");
            Ok(LoadOutcome::Restored(restored))
        }
        .instrument(span)
        .await
    }
}
