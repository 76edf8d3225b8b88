pub mod analyze_clip;
pub mod capture_clip;
pub mod connect_peer;
pub mod copy_to_clipboard;
pub mod delete_clip;
pub mod expire_clips;
pub mod load_history;
pub mod paste_from_clipboard;
pub mod select_clip;
pub mod sync_inbound;
pub mod sync_outbound;
pub mod sync_status;
pub mod toggle_favorite;

pub use analyze_clip::AnalyzeClip;
pub use capture_clip::{CaptureClip, CaptureOutcome, EphemeralArm};
pub use connect_peer::{ConnectOrigin, ConnectPeer};
pub use copy_to_clipboard::CopyClipToClipboard;
pub use delete_clip::DeleteClip;
pub use expire_clips::ExpireEphemeralClips;
pub use load_history::{LoadHistory, LoadOutcome};
pub use paste_from_clipboard::{PasteFromClipboard, PasteOutcome};
pub use select_clip::SelectClip;
pub use sync_inbound::{InboundOutcome, ReceivePeerMessage};
pub use sync_outbound::BroadcastClip;
pub use sync_status::{GetSyncStatus, SyncStatus};
pub use toggle_favorite::ToggleFavorite;
