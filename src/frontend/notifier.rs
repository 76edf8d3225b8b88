use std::io::{self, Write};
use std::sync::Mutex;

use sc_core::ports::NotifierPort;
use sc_core::Notice;

/// Prints notices as they arrive, one line each.
pub struct TerminalNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalNotifier {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }
}

impl NotifierPort for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        let marker = match notice {
            Notice::Error(_)
            | Notice::ClipboardAccessDenied
            | Notice::StorageFull
            | Notice::DeliveryFailed(_) => "!",
            _ => "*",
        };
        let _ = writeln!(out, "{marker} {notice}");
        let _ = out.flush();
    }
}
