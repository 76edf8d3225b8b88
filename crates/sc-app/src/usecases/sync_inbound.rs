use std::sync::Arc;

use sc_core::network::InboundMessage;
use sc_core::ports::{ClockPort, NotifierPort};
use sc_core::{Clip, ClipId, Notice, PeerMessage};
use tracing::{debug, info, info_span, Instrument};

use crate::history_store::HistoryStore;
use crate::usecases::AnalyzeClip;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundOutcome {
    Accepted,
    /// A clip with the same id is already in the history.
    Duplicate,
    /// The clip's expiry passed before it arrived.
    Expired,
    Deleted,
    UnknownClip,
}

/// Applies a message received from a peer to the local history.
pub struct ReceivePeerMessage {
    history: Arc<HistoryStore>,
    notifier: Arc<dyn NotifierPort>,
    clock: Arc<dyn ClockPort>,
    analyze: AnalyzeClip,
}

impl ReceivePeerMessage {
    pub fn new(
        history: Arc<HistoryStore>,
        notifier: Arc<dyn NotifierPort>,
        clock: Arc<dyn ClockPort>,
        analyze: AnalyzeClip,
    ) -> Self {
        Self {
            history,
            notifier,
            clock,
            analyze,
        }
    }

    pub async fn execute(&self, inbound: InboundMessage) -> InboundOutcome {
        let span = info_span!(
            "usecase.clip.sync_inbound.execute",
            from_peer = %inbound.from_peer,
            message = inbound.message.kind(),
            clip_id = %inbound.message.clip_id(),
        );

        async move {
            match inbound.message {
                PeerMessage::NewClip(clip) => self.accept_clip(clip).await,
                PeerMessage::DeleteClip(clip_id) => self.delete_clip(&clip_id).await,
            }
        }
        .instrument(span)
        .await
    }

    async fn accept_clip(&self, clip: Clip) -> InboundOutcome {
        if clip.is_expired(self.clock.now_ms()) {
            debug!("Dropping clip that expired in transit");
            return InboundOutcome::Expired;
        }

        let notice = if clip.is_ephemeral() {
            Notice::ReceivedPrivateClip
        } else {
            Notice::ReceivedFrom(clip.device_name.clone())
        };
        let pending_analysis = clip
            .summary
            .is_none()
            .then(|| (clip.id.clone(), clip.content.clone(), clip.kind));

        let inserted = self
            .history
            .update(|history| history.insert_remote(clip))
            .await;
        if !inserted {
            debug!("Ignoring clip already in history");
            return InboundOutcome::Duplicate;
        }

        info!("Clip received from peer");
        self.notifier.notify(notice);

        if let Some((clip_id, content, kind)) = pending_analysis {
            self.analyze.spawn(clip_id, content, kind);
        }
        InboundOutcome::Accepted
    }

    async fn delete_clip(&self, clip_id: &ClipId) -> InboundOutcome {
        match self.history.update(|history| history.remove(clip_id)).await {
            Some(_) => {
                info!("Clip deleted by peer");
                InboundOutcome::Deleted
            }
            None => {
                debug!("Peer deleted a clip we do not have");
                InboundOutcome::UnknownClip
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{eventually, remote_clip, Harness};

    fn usecase(harness: &Harness, history: Arc<HistoryStore>) -> ReceivePeerMessage {
        ReceivePeerMessage::new(
            history.clone(),
            harness.notifier.clone(),
            harness.clock.clone(),
            AnalyzeClip::new(harness.analyzer.clone(), history),
        )
    }

    fn new_clip(clip: Clip) -> InboundMessage {
        InboundMessage {
            from_peer: "12D3KooWRemote".to_string(),
            message: PeerMessage::NewClip(clip),
        }
    }

    #[tokio::test]
    async fn new_clip_is_prepended_announced_and_analysed() {
        let harness = Harness::new();
        let history = harness.history();
        history
            .update(|h| h.insert_remote(remote_clip("old", "older")))
            .await;
        let receive = usecase(&harness, history.clone());

        let outcome = receive.execute(new_clip(remote_clip("new", "fresh"))).await;

        assert_eq!(outcome, InboundOutcome::Accepted);
        let ids: Vec<String> = history
            .read(|h| h.items().iter().map(|c| c.id.to_string()).collect())
            .await;
        assert_eq!(ids, vec!["new", "old"]);
        assert_eq!(
            harness.notifier.notices(),
            vec![Notice::ReceivedFrom("Pixel".to_string())]
        );

        eventually(|| {
            let history = history.clone();
            async move {
                history
                    .read(|h| h.get(&"new".into()).and_then(|c| c.summary.clone()))
                    .await
                    .is_some()
            }
        })
        .await;
    }

    #[tokio::test]
    async fn duplicate_id_is_ignored_silently() {
        let harness = Harness::new();
        let history = harness.history();
        let receive = usecase(&harness, history.clone());

        receive.execute(new_clip(remote_clip("c1", "one"))).await;
        let outcome = receive.execute(new_clip(remote_clip("c1", "one again"))).await;

        assert_eq!(outcome, InboundOutcome::Duplicate);
        assert_eq!(history.read(|h| h.len()).await, 1);
        assert_eq!(harness.notifier.notices().len(), 1);
    }

    #[tokio::test]
    async fn ephemeral_clip_raises_private_notice() {
        let harness = Harness::new();
        let receive = usecase(&harness, harness.history());
        let mut clip = remote_clip("p1", "secret");
        clip.expires_at = Some(1_700_000_060_000);

        receive.execute(new_clip(clip)).await;

        assert_eq!(harness.notifier.notices(), vec![Notice::ReceivedPrivateClip]);
    }

    #[tokio::test]
    async fn clip_expired_in_transit_is_dropped() {
        let harness = Harness::new();
        let history = harness.history();
        let receive = usecase(&harness, history.clone());
        let mut clip = remote_clip("p1", "secret");
        clip.expires_at = Some(1_600_000_000_000);

        let outcome = receive.execute(new_clip(clip)).await;

        assert_eq!(outcome, InboundOutcome::Expired);
        assert!(history.read(|h| h.is_empty()).await);
        assert!(harness.notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn summarised_clip_is_not_reanalysed() {
        let harness = Harness::new();
        let receive = usecase(&harness, harness.history());
        let mut clip = remote_clip("c1", "https://example.com");
        clip.summary = Some("Example site".to_string());

        receive.execute(new_clip(clip)).await;
        tokio::task::yield_now().await;

        assert!(harness.analyzer.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_message_removes_the_clip() {
        let harness = Harness::new();
        let history = harness.history();
        let receive = usecase(&harness, history.clone());
        receive.execute(new_clip(remote_clip("c1", "one"))).await;

        let deleted = receive
            .execute(InboundMessage {
                from_peer: "12D3KooWRemote".to_string(),
                message: PeerMessage::DeleteClip(ClipId::from("c1")),
            })
            .await;
        let unknown = receive
            .execute(InboundMessage {
                from_peer: "12D3KooWRemote".to_string(),
                message: PeerMessage::DeleteClip(ClipId::from("c1")),
            })
            .await;

        assert_eq!(deleted, InboundOutcome::Deleted);
        assert_eq!(unknown, InboundOutcome::UnknownClip);
        assert!(history.read(|h| h.is_empty()).await);
    }
}
