//! # SyncClip
//!
//! Terminal front end and process bootstrap. The clip logic lives in the
//! workspace crates; this crate parses arguments, loads configuration,
//! wires adapters into [`sc_app::SyncClipApp`] and runs the command loop.

pub mod bootstrap;
pub mod cli;
pub mod frontend;

pub use bootstrap::run_app;
