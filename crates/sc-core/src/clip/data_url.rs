use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

const PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("not a base64 data URL")]
    Malformed,

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// A `data:<mime>;base64,<payload>` URL, the content encoding of image clips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    /// Base64 payload, still encoded.
    pub data: String,
}

impl DataUrl {
    /// Splits a data URL into mime type and payload.
    ///
    /// Both parts must be non-empty and neither may span lines. The mime part
    /// extends to the last `;base64,` marker.
    pub fn parse(input: &str) -> Result<Self, DataUrlError> {
        let rest = input.strip_prefix(PREFIX).ok_or(DataUrlError::Malformed)?;
        let marker = rest.rfind(BASE64_MARKER).ok_or(DataUrlError::Malformed)?;
        let mime = &rest[..marker];
        let data = &rest[marker + BASE64_MARKER.len()..];

        if mime.is_empty() || data.is_empty() || mime.contains('\n') || data.contains('\n') {
            return Err(DataUrlError::Malformed);
        }

        Ok(Self {
            mime: mime.to_string(),
            data: data.to_string(),
        })
    }

    pub fn encode(mime: &str, bytes: &[u8]) -> Self {
        Self {
            mime: mime.to_string(),
            data: STANDARD.encode(bytes),
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>, DataUrlError> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| DataUrlError::InvalidBase64(e.to_string()))
    }

    /// Approximate decoded size in bytes.
    pub fn decoded_len(&self) -> usize {
        let padding = self.data.chars().rev().take_while(|c| *c == '=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

impl std::fmt::Display for DataUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{PREFIX}{}{BASE64_MARKER}{}", self.mime, self.data)
    }
}
