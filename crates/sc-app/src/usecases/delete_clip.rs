use std::sync::Arc;

use anyhow::{anyhow, Result};
use sc_core::{Clip, ClipId};
use tracing::{info, info_span, warn, Instrument};

use crate::history_store::HistoryStore;
use crate::usecases::BroadcastClip;

/// Removes a clip from the local history, optionally telling peers.
pub struct DeleteClip {
    history: Arc<HistoryStore>,
    broadcast: BroadcastClip,
    propagate: bool,
}

impl DeleteClip {
    pub fn new(history: Arc<HistoryStore>, broadcast: BroadcastClip, propagate: bool) -> Self {
        Self {
            history,
            broadcast,
            propagate,
        }
    }

    pub async fn execute(&self, clip_id: &ClipId) -> Result<Clip> {
        let span = info_span!(
            "usecase.clip.delete.execute",
            clip_id = %clip_id,
            propagate = self.propagate,
        );

        async move {
            let removed = self
                .history
                .update(|history| history.remove(clip_id))
                .await
                .ok_or_else(|| anyhow!("Clip not found: {}", clip_id))?;
            info!("Clip deleted");

            if self.propagate {
                if let Err(err) = self.broadcast.announce_delete(clip_id).await {
                    warn!(error = %err, "Failed to announce deletion to peers");
                }
            }
            Ok(removed)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{remote_clip, Harness};
    use sc_core::PeerMessage;

    #[tokio::test]
    async fn local_delete_stays_local_by_default() {
        let harness = Harness::new();
        let history = harness.history();
        history.update(|h| h.insert_remote(remote_clip("c1", "one"))).await;
        let delete = DeleteClip::new(
            history.clone(),
            BroadcastClip::new(harness.network.clone()),
            false,
        );

        let removed = delete.execute(&ClipId::from("c1")).await.unwrap();

        assert_eq!(removed.content, "one");
        assert!(history.read(|h| h.is_empty()).await);
        assert!(harness.network.broadcasts().is_empty());
    }

    #[tokio::test]
    async fn propagating_delete_announces_the_id() {
        let harness = Harness::new();
        let history = harness.history();
        history.update(|h| h.insert_remote(remote_clip("c1", "one"))).await;
        let delete = DeleteClip::new(history, BroadcastClip::new(harness.network.clone()), true);

        delete.execute(&ClipId::from("c1")).await.unwrap();

        assert_eq!(
            harness.network.broadcasts(),
            vec![PeerMessage::DeleteClip(ClipId::from("c1"))]
        );
    }

    #[tokio::test]
    async fn missing_clip_is_an_error() {
        let harness = Harness::new();
        let delete = DeleteClip::new(
            harness.history(),
            BroadcastClip::new(harness.network.clone()),
            true,
        );

        let err = delete.execute(&ClipId::from("nope")).await.unwrap_err();

        assert!(err.to_string().contains("nope"));
        assert!(harness.network.broadcasts().is_empty());
    }
}
