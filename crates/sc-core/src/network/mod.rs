//! Peer-to-peer message shapes and network events.

mod events;
mod message;

pub use events::{ConnectedPeer, DiscoveredPeer, NetworkEvent};
pub use message::{InboundMessage, MessageAck, PeerMessage};
