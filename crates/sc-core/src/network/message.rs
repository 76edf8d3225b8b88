use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::ids::ClipId;

/// Message exchanged between peers.
///
/// Encoded as `{ "type": "NEW_CLIP", "payload": <clip> }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeerMessage {
    NewClip(Clip),
    DeleteClip(ClipId),
}

impl PeerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            PeerMessage::NewClip(_) => "NEW_CLIP",
            PeerMessage::DeleteClip(_) => "DELETE_CLIP",
        }
    }

    pub fn clip_id(&self) -> &ClipId {
        match self {
            PeerMessage::NewClip(clip) => &clip.id,
            PeerMessage::DeleteClip(id) => id,
        }
    }
}

/// Acknowledgement returned for every delivered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MessageAck {
    pub accepted: bool,
}

/// A message received from a remote peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub from_peer: String,
    pub message: PeerMessage,
}
