use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use sc_core::network::{ConnectedPeer, InboundMessage, NetworkEvent, PeerMessage};
use sc_core::ports::{DialOutcome, NetworkPort};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Stand-in network for offline runs (`--no-network` or `network.enabled = false`).
///
/// Holds the sending halves so subscribers see open, silent channels.
pub struct DisabledNetworkAdapter {
    _event_tx: mpsc::Sender<NetworkEvent>,
    event_rx: Mutex<Option<mpsc::Receiver<NetworkEvent>>>,
    _message_tx: mpsc::Sender<InboundMessage>,
    message_rx: Mutex<Option<mpsc::Receiver<InboundMessage>>>,
}

impl DisabledNetworkAdapter {
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::channel(1);
        let (message_tx, message_rx) = mpsc::channel(1);
        Self {
            _event_tx: event_tx,
            event_rx: Mutex::new(Some(event_rx)),
            _message_tx: message_tx,
            message_rx: Mutex::new(Some(message_rx)),
        }
    }
}

impl Default for DisabledNetworkAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn take<T>(slot: &Mutex<Option<mpsc::Receiver<T>>>, name: &str) -> Result<mpsc::Receiver<T>> {
    slot.lock()
        .map_err(|_| anyhow!("{name} receiver mutex poisoned"))?
        .take()
        .ok_or_else(|| anyhow!("{name} receiver already taken"))
}

#[async_trait]
impl NetworkPort for DisabledNetworkAdapter {
    async fn start(&self) -> Result<()> {
        debug!("networking disabled, not starting a swarm");
        Ok(())
    }

    fn local_peer_id(&self) -> Option<String> {
        None
    }

    async fn share_links(&self) -> Vec<String> {
        Vec::new()
    }

    async fn dial(&self, _target: &str) -> Result<DialOutcome> {
        Err(anyhow!("networking is disabled"))
    }

    async fn broadcast(&self, _message: PeerMessage) -> Result<usize> {
        Ok(0)
    }

    async fn connected_peers(&self) -> Vec<ConnectedPeer> {
        Vec::new()
    }

    async fn subscribe_messages(&self) -> Result<mpsc::Receiver<InboundMessage>> {
        take(&self.message_rx, "peer message")
    }

    async fn subscribe_events(&self) -> Result<mpsc::Receiver<NetworkEvent>> {
        take(&self.event_rx, "network event")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_core::ClipId;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn disabled_network_is_silent_but_open() {
        let network = DisabledNetworkAdapter::new();
        network.start().await.unwrap();

        assert!(network.local_peer_id().is_none());
        assert!(network.dial("/ip4/10.0.0.2/tcp/4001").await.is_err());
        assert_eq!(
            network
                .broadcast(PeerMessage::DeleteClip(ClipId::from("c1")))
                .await
                .unwrap(),
            0
        );

        let mut events = network.subscribe_events().await.unwrap();
        assert!(timeout(Duration::from_millis(20), events.recv()).await.is_err());
        assert!(network.subscribe_events().await.is_err());
    }
}
