use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard access denied: {0}")]
    AccessDenied(String),

    #[error("clipboard format not supported: {0}")]
    Unsupported(String),

    #[error("clipboard backend error: {0}")]
    Backend(String),
}

/// What the system clipboard currently holds, in order of preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardReading {
    Image { png: Vec<u8> },
    Text(String),
    Empty,
}

pub trait SystemClipboardPort: Send + Sync {
    fn read(&self) -> Result<ClipboardReading, ClipboardError>;

    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;

    /// Writes an encoded image; `mime` names its format (`image/png`, `image/jpeg`, ...).
    fn write_image(&self, mime: &str, bytes: &[u8]) -> Result<(), ClipboardError>;
}
