//! Terminal front end: command parsing, rendering and the notice printer.

pub mod command;
pub mod notifier;
pub mod render;
pub mod repl;

pub use command::{Command, ParseError};
pub use notifier::TerminalNotifier;
pub use repl::{Flow, Repl};
