//! # sc-core
//!
//! Core domain models and business logic for SyncClip.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

pub mod analysis;
pub mod clip;
pub mod config;
pub mod device;
pub mod history;
pub mod ids;
pub mod network;
pub mod notice;
pub mod ports;

// Re-export commonly used types at the crate root
pub use analysis::AnalysisResult;
pub use clip::{Clip, ClipKind, DataUrl};
pub use config::AppConfig;
pub use device::{DeviceKind, LocalDevice};
pub use history::ClipHistory;
pub use ids::ClipId;
pub use network::{ConnectedPeer, NetworkEvent, PeerMessage};
pub use notice::Notice;
