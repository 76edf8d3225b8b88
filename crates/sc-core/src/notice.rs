//! Transient user-facing messages.

use std::fmt;

/// A short message surfaced to the user and then dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    LinkingDevice,
    DeviceConnected,
    DeviceDisconnected,
    ReceivedPrivateClip,
    ReceivedFrom(String),
    PastedFromClipboard,
    ClipboardEmpty,
    ClipboardAccessDenied,
    CopiedToClipboard,
    StorageFull,
    /// A clip could not be sent to the named device.
    DeliveryFailed(String),
    Error(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::LinkingDevice => f.write_str("Linking device..."),
            Notice::DeviceConnected => f.write_str("New device connected!"),
            Notice::DeviceDisconnected => f.write_str("Device disconnected"),
            Notice::ReceivedPrivateClip => f.write_str("Received Private Clip!"),
            Notice::ReceivedFrom(device) => write!(f, "Received from {device}"),
            Notice::PastedFromClipboard => f.write_str("Pasted from clipboard"),
            Notice::ClipboardEmpty => f.write_str("Clipboard is empty"),
            Notice::ClipboardAccessDenied => f.write_str(
                "Permission denied! Allow this application to access the system clipboard.",
            ),
            Notice::CopiedToClipboard => f.write_str("Copied to clipboard"),
            Notice::StorageFull => f.write_str("Storage limit reached, history not saved"),
            Notice::DeliveryFailed(device) => write!(f, "Clip not delivered to {device}"),
            Notice::Error(message) => f.write_str(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn received_from_names_the_device() {
        assert_eq!(
            Notice::ReceivedFrom("iPhone".to_string()).to_string(),
            "Received from iPhone"
        );
        assert_eq!(Notice::ReceivedPrivateClip.to_string(), "Received Private Clip!");
        assert_eq!(
            Notice::DeliveryFailed("REMOTE01".to_string()).to_string(),
            "Clip not delivered to REMOTE01"
        );
    }
}
