use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A peer discovered on the local network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredPeer {
    pub peer_id: String,
    pub addresses: Vec<String>,
    pub discovered_at: DateTime<Utc>,
}

/// A peer we have at least one open connection with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedPeer {
    pub peer_id: String,
    pub address: String,
    pub connected_at: DateTime<Utc>,
    /// Whether the remote side opened the connection.
    pub inbound: bool,
}

/// Core network events (domain layer)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NetworkEvent {
    /// The local node is reachable on a new address (full share link).
    Listening(String),

    // Discovery events
    PeerDiscovered(DiscoveredPeer),
    PeerLost(String), // peer_id

    // Connection events
    PeerConnected(ConnectedPeer),
    PeerDisconnected(String), // peer_id

    DeliveryFailed { peer_id: String, reason: String },
    Error(String),
}
