//! Local device identity as shown on clips.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Device id recorded on clips created before the network is up.
pub const OFFLINE_DEVICE_ID: &str = "local";

/// Characters of the peer id recorded on clips.
const CLIP_DEVICE_ID_LEN: usize = 5;

/// Characters of the peer id shown in the status line.
const DISPLAY_DEVICE_ID_LEN: usize = 8;

/// Device profiles a clip can be attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceKind {
    Mac,
    Windows,
    IPhone,
    Android,
}

impl DeviceKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            DeviceKind::Mac => "MacBook Pro",
            DeviceKind::Windows => "Windows PC",
            DeviceKind::IPhone => "iPhone",
            DeviceKind::Android => "Pixel",
        }
    }

    /// Profile matching the running platform; desktop platforms other than
    /// macOS are treated as a PC.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "macos" => DeviceKind::Mac,
            "ios" => DeviceKind::IPhone,
            "android" => DeviceKind::Android,
            _ => DeviceKind::Windows,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Identity stamped on locally created clips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDevice {
    pub device_id: String,
    pub device_name: String,
}

impl LocalDevice {
    /// Builds the identity from the local peer id, if the network is available.
    ///
    /// libp2p peer ids share a common multihash prefix, so the distinguishing
    /// tail of the id is used.
    pub fn new(peer_id: Option<&str>, device_name: impl Into<String>) -> Self {
        let device_id = peer_id
            .map(|id| tail(id, CLIP_DEVICE_ID_LEN).to_string())
            .unwrap_or_else(|| OFFLINE_DEVICE_ID.to_string());
        Self {
            device_id,
            device_name: device_name.into(),
        }
    }
}

/// Upper-cased short form of a peer id for display.
pub fn display_device_id(peer_id: &str) -> String {
    tail(peer_id, DISPLAY_DEVICE_ID_LEN).to_uppercase()
}

fn tail(s: &str, chars: usize) -> &str {
    let count = s.chars().count();
    match s.char_indices().nth(count.saturating_sub(chars)) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}
