use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a clip.
///
/// The wire and storage form is the upper-case name (`"TEXT"`, `"URL"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClipKind {
    #[default]
    Text,
    Url,
    Code,
    Email,
    Image,
}

impl ClipKind {
    pub const ALL: [ClipKind; 5] = [
        ClipKind::Text,
        ClipKind::Url,
        ClipKind::Code,
        ClipKind::Email,
        ClipKind::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClipKind::Text => "TEXT",
            ClipKind::Url => "URL",
            ClipKind::Code => "CODE",
            ClipKind::Email => "EMAIL",
            ClipKind::Image => "IMAGE",
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, ClipKind::Image)
    }
}

impl fmt::Display for ClipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClipKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClipKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown clip type: {s}"))
    }
}
