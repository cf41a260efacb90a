//! PNG implementation of the [`QrEncoder`] seam.
//!
//! Renders the QR module matrix to a grayscale PNG with a quiet zone, scaled
//! for comfortable phone-camera scanning.

use std::io::Cursor;

use image::{GrayImage, Luma};
use qrcode::{Color, QrCode};

use far_core::error::CoreError;
use far_core::qr::QrEncoder;

/// Pixels per QR module.
const MODULE_SCALE: u32 = 8;

/// Quiet zone around the code, in modules.
const QUIET_ZONE_MODULES: u32 = 4;

/// Encodes payload URLs into PNG bytes.
#[derive(Debug, Default)]
pub struct PngQrEncoder;

impl QrEncoder for PngQrEncoder {
    fn encode(&self, url: &str) -> Result<Vec<u8>, CoreError> {
        let code = QrCode::new(url.as_bytes())
            .map_err(|e| CoreError::Internal(format!("QR encoding failed: {e}")))?;

        let width = code.width() as u32;
        let colors = code.to_colors();
        let image_side = (width + 2 * QUIET_ZONE_MODULES) * MODULE_SCALE;

        let image = GrayImage::from_fn(image_side, image_side, |x, y| {
            let module_x = (x / MODULE_SCALE).checked_sub(QUIET_ZONE_MODULES);
            let module_y = (y / MODULE_SCALE).checked_sub(QUIET_ZONE_MODULES);
            let dark = match (module_x, module_y) {
                (Some(mx), Some(my)) if mx < width && my < width => {
                    colors[(my * width + mx) as usize] == Color::Dark
                }
                _ => false,
            };
            if dark { Luma([0u8]) } else { Luma([255u8]) }
        });

        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|e| CoreError::Internal(format!("PNG encoding failed: {e}")))?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use far_core::qr::payload_url;

    #[test]
    fn encodes_payload_url_to_png() {
        let url = payload_url("https://far.example.com/assets", "A1");
        let bytes = PngQrEncoder.encode(&url).unwrap();

        // PNG magic bytes.
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn same_asset_id_encodes_deterministically() {
        let url = payload_url("https://far.example.com/assets", "FA-0042");
        let a = PngQrEncoder.encode(&url).unwrap();
        let b = PngQrEncoder.encode(&url).unwrap();
        assert_eq!(a, b);
    }
}
