use anyhow::Result;
use image::{DynamicImage, ImageOutputFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

/// Encode `payload` as a PNG QR image. Stateless; the image decodes back to
/// the exact payload string.
pub fn encode_png(payload: &str) -> Result<Vec<u8>> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::Q)
        .map_err(|e| anyhow::anyhow!("QR encoding failed: {e}"))?;

    let img = code
        .render::<Luma<u8>>()
        .min_dimensions(480, 480)
        .build();

    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(img).write_to(&mut buf, ImageOutputFormat::Png)?;
    Ok(buf.into_inner())
}
