//! QR image ingestion for onboarding.
//!
//! Turning an image into its raw string payload is a supplied capability
//! behind the [`QrDecoder`] trait, so the onboarding flow has no direct
//! dependency on any decoding backend and tests can inject a stub. The
//! production adapter decodes the image with the `image` crate, converts
//! to grayscale, and extracts the payload with `rqrr`.
//!
//! Terminals paste file paths as text when files are dropped, so the add
//! dialog treats a pasted path ending in an image extension as an upload.

/// Image file extensions we recognize for pasted-path detection.
const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// Errors from QR ingestion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QrError {
    /// The image decoded fine but contained no readable QR code.
    #[error("no QR code found in the image")]
    NotFound,
    /// The bytes could not be decoded as an image at all.
    #[error("unreadable image: {0}")]
    UnreadableImage(String),
    /// The file could not be read.
    #[error("failed to read image file: {0}")]
    FileError(String),
}

/// Supplied capability: raw image bytes in, decoded payload string out.
pub trait QrDecoder: Send + Sync {
    fn decode(&self, image_bytes: &[u8]) -> Result<String, QrError>;
}

/// Production decoder backed by `image` + `rqrr`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl QrDecoder for RqrrDecoder {
    fn decode(&self, image_bytes: &[u8]) -> Result<String, QrError> {
        let img = image::load_from_memory(image_bytes)
            .map_err(|e| QrError::UnreadableImage(e.to_string()))?;
        let luma = img.to_luma8();
        let (width, height) = luma.dimensions();

        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            width as usize,
            height as usize,
            |x, y| luma.get_pixel(x as u32, y as u32)[0],
        );

        for grid in prepared.detect_grids() {
            if let Ok((_meta, content)) = grid.decode() {
                return Ok(content);
            }
        }
        Err(QrError::NotFound)
    }
}

/// Read an image file and decode its QR payload.
pub fn decode_qr_file(decoder: &dyn QrDecoder, path: &str) -> Result<String, QrError> {
    let bytes = std::fs::read(path.trim()).map_err(|e| QrError::FileError(e.to_string()))?;
    decoder.decode(&bytes)
}

/// Check if pasted text looks like a single image file path.
pub fn is_image_file_path(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.contains('\n') {
        return false;
    }
    let lower = trimmed.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
