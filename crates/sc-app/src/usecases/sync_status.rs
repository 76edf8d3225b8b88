use std::sync::Arc;

use sc_core::device::display_device_id;
use sc_core::ports::NetworkPort;
use sc_core::ConnectedPeer;

/// Snapshot of the sync state shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    /// Short upper-cased form of the local peer id, if the network is up.
    pub device_id: Option<String>,
    pub device_name: String,
    pub peers: Vec<ConnectedPeer>,
    pub share_links: Vec<String>,
}

impl SyncStatus {
    pub fn is_active(&self) -> bool {
        !self.peers.is_empty()
    }

    pub fn label(&self) -> &'static str {
        if self.is_active() {
            "SYNC ACTIVE"
        } else {
            "OFFLINE"
        }
    }
}

pub struct GetSyncStatus {
    network: Arc<dyn NetworkPort>,
    device_name: String,
}

impl GetSyncStatus {
    pub fn new(network: Arc<dyn NetworkPort>, device_name: String) -> Self {
        Self {
            network,
            device_name,
        }
    }

    pub async fn execute(&self) -> SyncStatus {
        SyncStatus {
            device_id: self
                .network
                .local_peer_id()
                .map(|peer_id| display_device_id(&peer_id)),
            device_name: self.device_name.clone(),
            peers: self.network.connected_peers().await,
            share_links: self.network.share_links().await,
        }
    }
}
