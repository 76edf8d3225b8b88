use std::sync::Arc;

use anyhow::{Context, Result};
use sc_core::ports::NetworkPort;
use sc_core::{Clip, ClipId, PeerMessage};
use tracing::{debug, info, info_span, Instrument};

/// Sends clip changes to every connected peer.
#[derive(Clone)]
pub struct BroadcastClip {
    network: Arc<dyn NetworkPort>,
}

impl BroadcastClip {
    pub fn new(network: Arc<dyn NetworkPort>) -> Self {
        Self { network }
    }

    /// Broadcasts a `NEW_CLIP`. The wire copy carries no summary, so every
    /// receiver runs its own analysis.
    pub async fn execute(&self, clip: &Clip) -> Result<usize> {
        let span = info_span!(
            "usecase.clip.sync_outbound.execute",
            clip_id = %clip.id,
            kind = %clip.kind,
            ephemeral = clip.is_ephemeral(),
        );

        let mut wire = clip.clone();
        wire.summary = None;
        wire.tags.clear();

        self.send(PeerMessage::NewClip(wire)).instrument(span).await
    }

    /// Broadcasts a `DELETE_CLIP` for a clip removed locally.
    pub async fn announce_delete(&self, clip_id: &ClipId) -> Result<usize> {
        let span = info_span!("usecase.clip.sync_outbound.delete", clip_id = %clip_id);
        self.send(PeerMessage::DeleteClip(clip_id.clone()))
            .instrument(span)
            .await
    }

    async fn send(&self, message: PeerMessage) -> Result<usize> {
        let kind = message.kind();
        let delivered = self
            .network
            .broadcast(message)
            .await
            .with_context(|| format!("failed to broadcast {kind}"))?;

        if delivered == 0 {
            debug!(message = kind, "No connected peers, nothing sent");
        } else {
            info!(message = kind, peers = delivered, "Message broadcast to peers");
        }
        Ok(delivered)
    }
}
