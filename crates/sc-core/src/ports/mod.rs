//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations. The core stays independent of
//! storage engines, HTTP clients, network stacks and the OS clipboard.

mod analyzer;
mod clipboard;
mod clock;
pub mod identity_store;
pub mod network;
mod notifier;
mod storage;

pub use analyzer::{AnalysisError, ContentAnalyzerPort};
pub use clipboard::{ClipboardError, ClipboardReading, SystemClipboardPort};
pub use clock::ClockPort;
pub use identity_store::{IdentityStoreError, IdentityStorePort};
pub use network::{DialOutcome, NetworkPort};
pub use notifier::NotifierPort;
pub use storage::{KeyValueStorePort, StorageError};
