use std::sync::Arc;

use anyhow::{anyhow, Result};
use sc_core::ClipId;
use tracing::info;

use crate::history_store::HistoryStore;

pub struct ToggleFavorite {
    history: Arc<HistoryStore>,
}

impl ToggleFavorite {
    pub fn new(history: Arc<HistoryStore>) -> Self {
        Self { history }
    }

    /// Returns the new favorite state.
    #[tracing::instrument(name = "usecase.clip.toggle_favorite.execute", skip(self), fields(clip_id = %clip_id))]
    pub async fn execute(&self, clip_id: &ClipId) -> Result<bool> {
        let favorite = self
            .history
            .update(|history| history.toggle_favorite(clip_id))
            .await
            .ok_or_else(|| anyhow!("Clip not found: {}", clip_id))?;
        info!(favorite, "Favorite toggled");
        Ok(favorite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{remote_clip, Harness};

    #[tokio::test]
    async fn toggles_and_persists() {
        let harness = Harness::new();
        let history = harness.history();
        history.update(|h| h.insert_remote(remote_clip("c1", "one"))).await;
        let toggle = ToggleFavorite::new(history);

        assert!(toggle.execute(&ClipId::from("c1")).await.unwrap());
        assert!(!toggle.execute(&ClipId::from("c1")).await.unwrap());
        assert_eq!(harness.storage.writes(), 3);
        assert!(toggle.execute(&ClipId::from("c2")).await.is_err());
    }
}
