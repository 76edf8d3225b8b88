use std::sync::Arc;

use sc_core::ports::{ClipboardError, ClipboardReading, NotifierPort, SystemClipboardPort};
use sc_core::{ClipKind, DataUrl, Notice};
use tracing::{debug, info_span, warn, Instrument};

use crate::usecases::{CaptureClip, CaptureOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOutcome {
    Captured(CaptureOutcome),
    Empty,
    /// The clipboard could not be read.
    Unavailable,
}

/// Captures whatever the system clipboard holds, preferring images.
pub struct PasteFromClipboard {
    clipboard: Arc<dyn SystemClipboardPort>,
    notifier: Arc<dyn NotifierPort>,
    capture: CaptureClip,
}

impl PasteFromClipboard {
    pub fn new(
        clipboard: Arc<dyn SystemClipboardPort>,
        notifier: Arc<dyn NotifierPort>,
        capture: CaptureClip,
    ) -> Self {
        Self {
            clipboard,
            notifier,
            capture,
        }
    }

    pub async fn execute(&self) -> PasteOutcome {
        let span = info_span!("usecase.clipboard.paste.execute");

        async move {
            let clipboard = self.clipboard.clone();
            let reading = tokio::task::spawn_blocking(move || clipboard.read())
                .await
                .map_err(|err| ClipboardError::Backend(err.to_string()))
                .and_then(|reading| reading);

            match reading {
                Ok(ClipboardReading::Image { png }) => {
                    debug!(bytes = png.len(), "Pasting image");
                    let content = DataUrl::encode("image/png", &png).to_string();
                    PasteOutcome::Captured(self.capture.execute(content, ClipKind::Image).await)
                }
                Ok(ClipboardReading::Text(text)) if !text.trim().is_empty() => {
                    let outcome = self.capture.execute(text, ClipKind::Text).await;
                    if matches!(outcome, CaptureOutcome::Added(_)) {
                        self.notifier.notify(Notice::PastedFromClipboard);
                    }
                    PasteOutcome::Captured(outcome)
                }
                Ok(_) => {
                    self.notifier.notify(Notice::ClipboardEmpty);
                    PasteOutcome::Empty
                }
                Err(ClipboardError::Unsupported(reason)) => {
                    debug!(reason = %reason, "Clipboard holds nothing we can paste");
                    self.notifier.notify(Notice::ClipboardEmpty);
                    PasteOutcome::Empty
                }
                Err(err) => {
                    warn!(error = %err, "Failed to read the system clipboard");
                    self.notifier.notify(Notice::ClipboardAccessDenied);
                    PasteOutcome::Unavailable
                }
            }
        }
        .instrument(span)
        .await
    }
}
