use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use sc_core::ports::{ClipboardError, NotifierPort, SystemClipboardPort};
use sc_core::{ClipId, DataUrl, Notice};
use tracing::{info, info_span, Instrument};

use crate::history_store::HistoryStore;

/// Writes a clip back to the system clipboard.
pub struct CopyClipToClipboard {
    history: Arc<HistoryStore>,
    clipboard: Arc<dyn SystemClipboardPort>,
    notifier: Arc<dyn NotifierPort>,
}

impl CopyClipToClipboard {
    pub fn new(
        history: Arc<HistoryStore>,
        clipboard: Arc<dyn SystemClipboardPort>,
        notifier: Arc<dyn NotifierPort>,
    ) -> Self {
        Self {
            history,
            clipboard,
            notifier,
        }
    }

    pub async fn execute(&self, clip_id: &ClipId) -> Result<()> {
        let span = info_span!("usecase.clipboard.copy.execute", clip_id = %clip_id);

        async move {
            let clip = self
                .history
                .read(|history| history.get(clip_id).cloned())
                .await
                .ok_or_else(|| anyhow!("Clip not found: {}", clip_id))?;

            let clipboard = self.clipboard.clone();
            let written = if clip.kind.is_image() {
                let url = DataUrl::parse(&clip.content)
                    .context("image clip does not hold a data URL")?;
                let bytes = url.decode().context("image clip payload is not valid base64")?;
                let mime = url.mime;
                tokio::task::spawn_blocking(move || clipboard.write_image(&mime, &bytes)).await
            } else {
                let text = clip.content;
                tokio::task::spawn_blocking(move || clipboard.write_text(&text)).await
            };

            match written
                .map_err(|err| ClipboardError::Backend(err.to_string()))
                .and_then(|result| result)
            {
                Ok(()) => {
                    info!("Clip copied to system clipboard");
                    self.notifier.notify(Notice::CopiedToClipboard);
                    Ok(())
                }
                Err(err @ ClipboardError::AccessDenied(_)) => {
                    self.notifier.notify(Notice::ClipboardAccessDenied);
                    Err(err).context("system clipboard refused the write")
                }
                Err(err) => Err(err).context("failed to write to the system clipboard"),
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{remote_clip, FakeClipboard, Harness};
    use sc_core::ClipKind;

    #[tokio::test]
    async fn text_clip_is_written_as_text() {
        let harness = Harness::new();
        let history = harness.history();
        history.update(|h| h.insert_remote(remote_clip("c1", "hello"))).await;
        let copy = CopyClipToClipboard::new(history, harness.clipboard.clone(), harness.notifier.clone());

        copy.execute(&ClipId::from("c1")).await.unwrap();

        assert_eq!(harness.clipboard.texts(), vec!["hello".to_string()]);
        assert_eq!(harness.notifier.notices(), vec![Notice::CopiedToClipboard]);
    }

    #[tokio::test]
    async fn image_clip_is_decoded_before_writing() {
        let harness = Harness::new();
        let history = harness.history();
        let mut clip = remote_clip("img", "data:image/jpeg;base64,/9j/");
        clip.kind = ClipKind::Image;
        history.update(|h| h.insert_remote(clip)).await;
        let copy = CopyClipToClipboard::new(history, harness.clipboard.clone(), harness.notifier.clone());

        copy.execute(&ClipId::from("img")).await.unwrap();

        assert_eq!(
            harness.clipboard.images(),
            vec![("image/jpeg".to_string(), vec![0xff, 0xd8, 0xff])]
        );
    }

    #[tokio::test]
    async fn denied_write_raises_permission_notice() {
        let mut harness = Harness::new();
        harness.clipboard = Arc::new(FakeClipboard::denied());
        let history = harness.history();
        history.update(|h| h.insert_remote(remote_clip("c1", "hello"))).await;
        let copy = CopyClipToClipboard::new(history, harness.clipboard.clone(), harness.notifier.clone());

        assert!(copy.execute(&ClipId::from("c1")).await.is_err());
        assert_eq!(
            harness.notifier.notices(),
            vec![Notice::ClipboardAccessDenied]
        );
    }
}
