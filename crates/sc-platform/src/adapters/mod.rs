//! # Platform Adapters / 平台适配器
//!
//! Implementations of the sc-core ports that need the OS or the network.
//! 需要操作系统或网络支持的端口实现。
//!
//! - `libp2p_network` - P2P networking (mDNS discovery, clip messages)
//! - `disabled_network` - offline stand-in for the network port
//! - `clipboard` - system clipboard via clipboard-rs

pub mod clipboard;
pub mod disabled_network;
pub mod libp2p_network;

pub use clipboard::ClipboardRsAdapter;
pub use disabled_network::DisabledNetworkAdapter;
pub use libp2p_network::{Libp2pNetworkAdapter, PeerCaches, CLIP_PROTOCOL};
