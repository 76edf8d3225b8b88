//! SyncClip Application Orchestration Layer
//!
//! This crate contains the clip use cases and the runtime loops that tie the
//! network, the analyzer and the persisted history together.

pub mod app;
pub mod deps;
pub mod history_store;
pub mod runtime;
pub mod usecases;

#[cfg(test)]
pub(crate) mod test_support;

pub use app::{AppSettings, SyncClipApp};
pub use deps::AppDeps;
pub use history_store::{HistoryStore, HISTORY_STORAGE_KEY};
