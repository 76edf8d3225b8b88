//! Network port - abstracts P2P network capabilities
//!
//! This port defines the interface for dialing peers, broadcasting clip
//! messages to every open connection and subscribing to inbound traffic.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::network::{ConnectedPeer, InboundMessage, NetworkEvent, PeerMessage};

/// What happened to a dial request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialOutcome {
    Dialing,
    AlreadyConnected,
    /// The target is this node; nothing was dialed.
    SelfDial,
}

#[async_trait]
pub trait NetworkPort: Send + Sync {
    /// Start listening and processing network traffic.
    async fn start(&self) -> Result<()>;

    /// Get local peer ID; `None` when networking is disabled.
    fn local_peer_id(&self) -> Option<String>;

    /// Addresses other instances can dial to reach this one.
    async fn share_links(&self) -> Vec<String>;

    /// Dial a peer by address (`/ip4/.../tcp/.../p2p/<id>`) or by a peer id
    /// already known through discovery.
    async fn dial(&self, target: &str) -> Result<DialOutcome>;

    /// Send a message to every connected peer. Returns how many peers it was
    /// handed to.
    async fn broadcast(&self, message: PeerMessage) -> Result<usize>;

    /// Get currently connected peers
    async fn connected_peers(&self) -> Vec<ConnectedPeer>;

    /// Subscribe to messages received from remote peers. Single consumer.
    async fn subscribe_messages(&self) -> Result<mpsc::Receiver<InboundMessage>>;

    /// Subscribe to network events. Single consumer.
    async fn subscribe_events(&self) -> Result<mpsc::Receiver<NetworkEvent>>;
}
