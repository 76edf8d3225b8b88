//! Application facade used by the front end.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sc_core::ports::{DialOutcome, NetworkPort};
use sc_core::{AppConfig, Clip, ClipKind, LocalDevice};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::deps::AppDeps;
use crate::history_store::HistoryStore;
use crate::runtime::AppRuntime;
use crate::usecases::*;

/// Behaviour knobs taken from [`AppConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub device_name: String,
    pub ephemeral_ttl: Duration,
    pub expiry_sweep_interval: Duration,
    pub propagate_deletes: bool,
    pub max_history_items: usize,
}

impl AppSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            device_name: config.device_name(),
            ephemeral_ttl: config.sync.ephemeral_ttl(),
            expiry_sweep_interval: config.sync.expiry_sweep_interval(),
            propagate_deletes: config.sync.propagate_deletes,
            max_history_items: config.storage.history_capacity(),
        }
    }
}

/// The running application: one history, its use cases and the runtime loops.
///
/// Clip commands take a reference (list position, id or id prefix); `None`
/// means the selected clip.
pub struct SyncClipApp {
    device: LocalDevice,
    history: Arc<HistoryStore>,
    network: Arc<dyn NetworkPort>,
    ephemeral: Arc<EphemeralArm>,
    load: LoadHistory,
    capture: CaptureClip,
    paste: PasteFromClipboard,
    copy: CopyClipToClipboard,
    select: SelectClip,
    delete: DeleteClip,
    favorite: ToggleFavorite,
    connect: ConnectPeer,
    status: GetSyncStatus,
    runtime: AppRuntime,
}

impl SyncClipApp {
    pub fn new(deps: AppDeps, settings: AppSettings) -> Self {
        let AppDeps {
            storage,
            analyzer,
            network,
            clipboard,
            notifier,
            clock,
        } = deps;

        let device = LocalDevice::new(network.local_peer_id().as_deref(), &settings.device_name);
        let history = Arc::new(HistoryStore::new(
            storage,
            notifier.clone(),
            settings.max_history_items,
        ));
        let ephemeral = Arc::new(EphemeralArm::default());

        let analyze = AnalyzeClip::new(analyzer, history.clone());
        let broadcast = BroadcastClip::new(network.clone());
        let capture = CaptureClip::new(
            history.clone(),
            clock.clone(),
            device.clone(),
            ephemeral.clone(),
            settings.ephemeral_ttl,
            broadcast.clone(),
            analyze.clone(),
        );
        let receive = ReceivePeerMessage::new(
            history.clone(),
            notifier.clone(),
            clock.clone(),
            analyze,
        );
        let runtime = AppRuntime::new(
            network.clone(),
            notifier.clone(),
            Arc::new(receive),
            Arc::new(ExpireEphemeralClips::new(history.clone(), clock.clone())),
            settings.expiry_sweep_interval,
        );

        Self {
            load: LoadHistory::new(history.clone(), clock),
            paste: PasteFromClipboard::new(clipboard.clone(), notifier.clone(), capture.clone()),
            copy: CopyClipToClipboard::new(history.clone(), clipboard, notifier.clone()),
            select: SelectClip::new(history.clone()),
            delete: DeleteClip::new(history.clone(), broadcast, settings.propagate_deletes),
            favorite: ToggleFavorite::new(history.clone()),
            connect: ConnectPeer::new(network.clone(), notifier),
            status: GetSyncStatus::new(network.clone(), settings.device_name),
            capture,
            runtime,
            device,
            history,
            network,
            ephemeral,
        }
    }

    pub fn device(&self) -> &LocalDevice {
        &self.device
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// Restores the history, starts the network and spawns the runtime loops.
    pub async fn start(&self, cancel: CancellationToken) -> Result<Vec<JoinHandle<()>>> {
        let outcome = self.load.execute().await?;
        info!(outcome = ?outcome, "History loaded");

        let handles = self.runtime.spawn(cancel).await?;
        self.network
            .start()
            .await
            .context("failed to start network")?;
        Ok(handles)
    }

    pub async fn add_text(&self, text: impl Into<String>) -> CaptureOutcome {
        self.capture.execute(text.into(), ClipKind::Text).await
    }

    pub async fn paste(&self) -> PasteOutcome {
        self.paste.execute().await
    }

    /// Arms or disarms the one-shot ephemeral flag; returns the new state.
    pub fn toggle_ephemeral(&self) -> bool {
        self.ephemeral.toggle()
    }

    pub fn is_ephemeral_armed(&self) -> bool {
        self.ephemeral.is_armed()
    }

    pub async fn clips(&self) -> Vec<Clip> {
        self.history.read(|history| history.items().to_vec()).await
    }

    pub async fn selected(&self) -> Option<Clip> {
        self.select.resolve(None).await.ok()
    }

    pub async fn clip(&self, reference: Option<&str>) -> Result<Clip> {
        self.select.resolve(reference).await
    }

    pub async fn select(&self, reference: &str) -> Result<Clip> {
        self.select.execute(reference).await
    }

    pub async fn clear_selection(&self) {
        self.select.clear().await
    }

    pub async fn copy(&self, reference: Option<&str>) -> Result<Clip> {
        let clip = self.select.resolve(reference).await?;
        self.copy.execute(&clip.id).await?;
        Ok(clip)
    }

    pub async fn toggle_favorite(&self, reference: Option<&str>) -> Result<(Clip, bool)> {
        let clip = self.select.resolve(reference).await?;
        let favorite = self.favorite.execute(&clip.id).await?;
        Ok((clip, favorite))
    }

    pub async fn delete(&self, reference: Option<&str>) -> Result<Clip> {
        let clip = self.select.resolve(reference).await?;
        self.delete.execute(&clip.id).await
    }

    /// Dials a share link; `None` when the link is blank.
    pub async fn connect(
        &self,
        target: &str,
        origin: ConnectOrigin,
    ) -> Result<Option<DialOutcome>> {
        self.connect.execute(target, origin).await
    }

    pub async fn status(&self) -> SyncStatus {
        self.status.execute().await
    }
}
