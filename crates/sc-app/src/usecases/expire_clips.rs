use std::sync::Arc;

use sc_core::ports::ClockPort;
use sc_core::ClipId;
use tracing::{info, trace};

use crate::history_store::HistoryStore;

/// Removes ephemeral clips whose deadline has passed.
pub struct ExpireEphemeralClips {
    history: Arc<HistoryStore>,
    clock: Arc<dyn ClockPort>,
}

impl ExpireEphemeralClips {
    pub fn new(history: Arc<HistoryStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { history, clock }
    }

    #[tracing::instrument(name = "usecase.clip.expire.execute", skip(self))]
    pub async fn execute(&self) -> Vec<ClipId> {
        let now = self.clock.now_ms();
        let removed = self
            .history
            .update(|history| history.sweep_expired(now))
            .await;

        if removed.is_empty() {
            trace!("No expired clips");
        } else {
            info!(count = removed.len(), "Expired ephemeral clips removed");
        }
        removed
    }
}
