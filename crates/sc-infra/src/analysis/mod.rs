//! Content analyzers: the remote Gemini classifier and an offline fallback.

mod gemini;
mod heuristic;

pub use gemini::GeminiAnalyzer;
pub use heuristic::{detect_kind, HeuristicAnalyzer};
