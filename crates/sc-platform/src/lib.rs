//! # sc-platform
//!
//! Platform-specific implementations for SyncClip.
//!
//! Adapters here talk to the operating system and the local network: the
//! libp2p swarm, the system clipboard and the on-disk node identity.

pub mod adapters;
pub mod identity_store;

pub use adapters::{ClipboardRsAdapter, DisabledNetworkAdapter, Libp2pNetworkAdapter};
pub use identity_store::{load_or_create_identity, FileIdentityStore};
