use std::sync::Arc;

use anyhow::{anyhow, Result};
use sc_core::{Clip, ClipId};
use tracing::debug;

use crate::history_store::HistoryStore;

/// Resolves user references to clips and moves the selection.
pub struct SelectClip {
    history: Arc<HistoryStore>,
}

impl SelectClip {
    pub fn new(history: Arc<HistoryStore>) -> Self {
        Self { history }
    }

    /// Resolves a list position, id or id prefix. `None` means the current selection.
    pub async fn resolve(&self, reference: Option<&str>) -> Result<Clip> {
        self.history
            .read(|history| match reference {
                Some(reference) => history
                    .find_by_reference(reference)
                    .cloned()
                    .ok_or_else(|| anyhow!("No clip matches '{}'", reference.trim())),
                None => history
                    .selected()
                    .cloned()
                    .ok_or_else(|| anyhow!("No clip selected")),
            })
            .await
    }

    pub async fn execute(&self, reference: &str) -> Result<Clip> {
        let clip = self.resolve(Some(reference)).await?;
        self.history.update(|history| history.select(&clip.id)).await;
        debug!(clip_id = %clip.id, "Clip selected");
        Ok(clip)
    }

    pub async fn clear(&self) {
        self.history.update(|history| history.clear_selection()).await;
    }

    pub async fn selected_id(&self) -> Option<ClipId> {
        self.history
            .read(|history| history.selected_id().cloned())
            .await
    }
}
