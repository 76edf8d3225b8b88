use std::io::Cursor;
use std::sync::Mutex;

use clipboard_rs::common::RustImage;
use clipboard_rs::{Clipboard, ClipboardContext, ContentFormat, RustImageData};
use image::ImageFormat;
use sc_core::ports::{ClipboardError, ClipboardReading, SystemClipboardPort};
use tracing::{debug, debug_span};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn backend_err(e: BoxError) -> ClipboardError {
    ClipboardError::Backend(e.to_string())
}

/// System clipboard through clipboard-rs.
///
/// The platform context is opened on first use, so a headless session only
/// fails the commands that touch the clipboard.
pub struct ClipboardRsAdapter {
    inner: Mutex<Option<ClipboardContext>>,
}

impl ClipboardRsAdapter {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    fn with_context<T>(
        &self,
        f: impl FnOnce(&ClipboardContext) -> Result<T, ClipboardError>,
    ) -> Result<T, ClipboardError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| ClipboardError::Backend("clipboard mutex poisoned".to_string()))?;
        if guard.is_none() {
            let ctx = ClipboardContext::new().map_err(|e| {
                ClipboardError::AccessDenied(format!("failed to open clipboard: {e}"))
            })?;
            *guard = Some(ctx);
        }
        match guard.as_ref() {
            Some(ctx) => f(ctx),
            None => Err(ClipboardError::Backend("clipboard unavailable".to_string())),
        }
    }
}

impl Default for ClipboardRsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClipboardPort for ClipboardRsAdapter {
    fn read(&self) -> Result<ClipboardReading, ClipboardError> {
        let span = debug_span!("platform.clipboard.read");
        span.in_scope(|| {
            self.with_context(|ctx| {
                if ctx.has(ContentFormat::Image) {
                    let image = ctx.get_image().map_err(backend_err)?;
                    let png = image.to_png().map_err(backend_err)?;
                    debug!(bytes = png.get_bytes().len(), "Read image from clipboard");
                    return Ok(ClipboardReading::Image {
                        png: png.get_bytes().to_vec(),
                    });
                }

                if ctx.has(ContentFormat::Text) {
                    let text = ctx.get_text().map_err(backend_err)?;
                    debug!(chars = text.chars().count(), "Read text from clipboard");
                    return Ok(ClipboardReading::Text(text));
                }

                Ok(ClipboardReading::Empty)
            })
        })
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let span = debug_span!("platform.clipboard.write_text", chars = text.chars().count());
        span.in_scope(|| self.with_context(|ctx| ctx.set_text(text.to_string()).map_err(backend_err)))
    }

    fn write_image(&self, mime: &str, bytes: &[u8]) -> Result<(), ClipboardError> {
        let span = debug_span!("platform.clipboard.write_image", mime, bytes = bytes.len());
        span.in_scope(|| {
            let png = ensure_png(mime, bytes)?;
            let image = RustImageData::from_bytes(&png).map_err(backend_err)?;
            self.with_context(|ctx| ctx.set_image(image).map_err(backend_err))
        })
    }
}

/// Returns PNG bytes, re-encoding other raster formats.
fn ensure_png(mime: &str, bytes: &[u8]) -> Result<Vec<u8>, ClipboardError> {
    if mime.eq_ignore_ascii_case("image/png") {
        return Ok(bytes.to_vec());
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ClipboardError::Unsupported(format!("{mime}: {e}")))?;
    let mut png = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| ClipboardError::Backend(format!("failed to encode PNG: {e}")))?;
    debug!(from = mime, bytes = png.len(), "Re-encoded image as PNG");
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn encoded(format: ImageFormat) -> Vec<u8> {
        let image = RgbaImage::from_pixel(2, 2, Rgba([200, 10, 10, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    #[test]
    fn png_passes_through_untouched() {
        let png = encoded(ImageFormat::Png);
        assert_eq!(ensure_png("image/png", &png).unwrap(), png);
    }

    #[test]
    fn other_formats_are_reencoded_as_png() {
        let bmp = encoded(ImageFormat::Bmp);

        let png = ensure_png("image/bmp", &bmp).unwrap();

        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (2, 2));
    }

    #[test]
    fn undecodable_images_are_unsupported() {
        let result = ensure_png("image/svg+xml", b"<svg></svg>");
        assert!(matches!(result, Err(ClipboardError::Unsupported(_))));
    }
}
