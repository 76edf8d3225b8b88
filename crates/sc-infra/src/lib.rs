pub mod analysis;
pub mod config;
pub mod fs;
pub mod storage;
pub mod time;

pub use analysis::{GeminiAnalyzer, HeuristicAnalyzer};
pub use storage::FileKeyValueStore;
pub use time::SystemClock;
