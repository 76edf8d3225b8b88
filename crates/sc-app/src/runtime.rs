//! Background loops: inbound peer messages, network events and the expiry sweep.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sc_core::device::display_device_id;
use sc_core::network::InboundMessage;
use sc_core::ports::{NetworkPort, NotifierPort};
use sc_core::{NetworkEvent, Notice};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::usecases::{ExpireEphemeralClips, ReceivePeerMessage};

pub struct AppRuntime {
    network: Arc<dyn NetworkPort>,
    notifier: Arc<dyn NotifierPort>,
    receive: Arc<ReceivePeerMessage>,
    expire: Arc<ExpireEphemeralClips>,
    sweep_interval: Duration,
}

impl AppRuntime {
    pub fn new(
        network: Arc<dyn NetworkPort>,
        notifier: Arc<dyn NotifierPort>,
        receive: Arc<ReceivePeerMessage>,
        expire: Arc<ExpireEphemeralClips>,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            network,
            notifier,
            receive,
            expire,
            sweep_interval,
        }
    }

    /// Subscribes to the network and spawns the loops. All of them stop when
    /// `cancel` fires.
    pub async fn spawn(&self, cancel: CancellationToken) -> Result<Vec<JoinHandle<()>>> {
        let messages = self
            .network
            .subscribe_messages()
            .await
            .context("failed to subscribe to peer messages")?;
        let events = self
            .network
            .subscribe_events()
            .await
            .context("failed to subscribe to network events")?;

        Ok(vec![
            tokio::spawn(run_inbound_loop(
                self.receive.clone(),
                messages,
                cancel.clone(),
            )),
            tokio::spawn(run_event_loop(self.notifier.clone(), events, cancel.clone())),
            tokio::spawn(run_expiry_ticker(
                self.expire.clone(),
                self.sweep_interval,
                cancel,
            )),
        ])
    }
}

async fn run_inbound_loop(
    receive: Arc<ReceivePeerMessage>,
    mut messages: mpsc::Receiver<InboundMessage>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            message = messages.recv() => match message {
                Some(message) => {
                    receive.execute(message).await;
                }
                None => {
                    debug!("Peer message channel closed");
                    break;
                }
            },
        }
    }
    debug!("Inbound message loop stopped");
}

async fn run_event_loop(
    notifier: Arc<dyn NotifierPort>,
    mut events: mpsc::Receiver<NetworkEvent>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            event = events.recv() => match event {
                Some(event) => handle_network_event(notifier.as_ref(), event),
                None => {
                    debug!("Network event channel closed");
                    break;
                }
            },
        }
    }
    debug!("Network event loop stopped");
}

fn handle_network_event(notifier: &dyn NotifierPort, event: NetworkEvent) {
    match event {
        NetworkEvent::Listening(link) => info!(link = %link, "Listening for peers"),
        NetworkEvent::PeerDiscovered(peer) => {
            debug!(peer_id = %peer.peer_id, addresses = ?peer.addresses, "Peer discovered")
        }
        NetworkEvent::PeerLost(peer_id) => debug!(peer_id = %peer_id, "Peer lost"),
        NetworkEvent::PeerConnected(peer) => {
            info!(peer_id = %peer.peer_id, inbound = peer.inbound, "Peer connected");
            if peer.inbound {
                notifier.notify(Notice::DeviceConnected);
            }
        }
        NetworkEvent::PeerDisconnected(peer_id) => {
            info!(peer_id = %peer_id, "Peer disconnected");
            notifier.notify(Notice::DeviceDisconnected);
        }
        NetworkEvent::DeliveryFailed { peer_id, reason } => {
            warn!(peer_id = %peer_id, reason = %reason, "Failed to deliver message");
            notifier.notify(Notice::DeliveryFailed(display_device_id(&peer_id)));
        }
        NetworkEvent::Error(message) => {
            warn!(error = %message, "Network error");
            notifier.notify(Notice::Error(format!("Network error: {message}")));
        }
    }
}

async fn run_expiry_ticker(
    expire: Arc<ExpireEphemeralClips>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                expire.execute().await;
            }
        }
    }
    debug!("Expiry ticker stopped");
}
