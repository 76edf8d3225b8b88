//! # Bootstrap / 启动引导
//!
//! Configuration, tracing, dependency wiring and the top-level run loop.

pub mod config;
pub mod run;
pub mod tracing;
pub mod wiring;

pub use config::{resolve_config, ResolvedConfig};
pub use run::run_app;
pub use wiring::{wire_dependencies, WiringError};
