use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sc_core::history::{AddRejection, ClipDraft};
use sc_core::ports::ClockPort;
use sc_core::{Clip, ClipKind, LocalDevice};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::history_store::HistoryStore;
use crate::usecases::{AnalyzeClip, BroadcastClip};

/// One-shot "next clip is ephemeral" switch.
///
/// Stays armed until a clip is actually accepted.
#[derive(Debug, Default)]
pub struct EphemeralArm(AtomicBool);

impl EphemeralArm {
    pub fn is_armed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Flips the switch and returns the new state.
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn disarm(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Added(Clip),
    Rejected(AddRejection),
}

/// Adds locally entered content to the history, then shares and analyses it.
#[derive(Clone)]
pub struct CaptureClip {
    history: Arc<HistoryStore>,
    clock: Arc<dyn ClockPort>,
    device: LocalDevice,
    ephemeral: Arc<EphemeralArm>,
    ephemeral_ttl: Duration,
    broadcast: BroadcastClip,
    analyze: AnalyzeClip,
}

impl CaptureClip {
    pub fn new(
        history: Arc<HistoryStore>,
        clock: Arc<dyn ClockPort>,
        device: LocalDevice,
        ephemeral: Arc<EphemeralArm>,
        ephemeral_ttl: Duration,
        broadcast: BroadcastClip,
        analyze: AnalyzeClip,
    ) -> Self {
        Self {
            history,
            clock,
            device,
            ephemeral,
            ephemeral_ttl,
            broadcast,
            analyze,
        }
    }

    pub async fn execute(&self, content: String, kind: ClipKind) -> CaptureOutcome {
        let armed = self.ephemeral.is_armed();
        let span = info_span!(
            "usecase.clip.capture.execute",
            kind = %kind,
            ephemeral = armed,
            len = content.len(),
        );

        async move {
            let now = self.clock.now_ms();
            let ttl_ms = i64::try_from(self.ephemeral_ttl.as_millis()).unwrap_or(i64::MAX);
            let draft = ClipDraft {
                content,
                kind,
                created_at_ms: now,
                expires_at_ms: armed.then(|| now.saturating_add(ttl_ms)),
            };

            let added = self
                .history
                .update(|history| history.add_local(draft, &self.device))
                .await;
            let clip = match added {
                Ok(clip) => clip,
                Err(rejection) => {
                    debug!(reason = %rejection, "Clip rejected");
                    return CaptureOutcome::Rejected(rejection);
                }
            };

            if armed {
                self.ephemeral.disarm();
            }
            info!(clip_id = %clip.id, "Clip added");

            if let Err(err) = self.broadcast.execute(&clip).await {
                warn!(error = %err, clip_id = %clip.id, "Failed to share clip with peers");
            }
            self.analyze
                .spawn(clip.id.clone(), clip.content.clone(), clip.kind);

            CaptureOutcome::Added(clip)
        }
        .instrument(span)
        .await
    }
}
