use crate::core::{RenderFrame, Result, SceneError, Seed};

/// Suggested file name for an exported scene.
pub fn export_filename(seed: Seed) -> String {
    format!("generated-boat-{}.png", seed)
}

/// Encode a RenderFrame::Pixels to a PNG byte vector.
/// - When the `image` feature is enabled, this will encode using the `image` crate.
/// - Without the feature, returns SceneError::NotSupported.
pub fn encode_png(frame: &RenderFrame) -> Result<Vec<u8>> {
    match frame {
        RenderFrame::Pixels { width, height, data } => encode_pixels_png(*width, *height, data),
    }
}

#[cfg(feature = "image")]
fn encode_pixels_png(width: u32, height: u32, pixels: &[u8]) -> Result<Vec<u8>> {
    use image::codecs::png::PngEncoder;
    use image::{ColorType, ImageEncoder};
    use std::io::Cursor;

    let count = (width as usize) * (height as usize);
    let channels = if pixels.len() == count * 3 {
        3
    } else if pixels.len() == count * 4 {
        4
    } else {
        return Err(SceneError::InvalidFrame(format!(
            "Pixel data length {} does not match width*height*3 or *4 ({}x{})",
            pixels.len(), width, height
        )));
    };

    let color = if channels == 3 { ColorType::Rgb8 } else { ColorType::Rgba8 };

    let mut buf = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buf);
        let encoder = PngEncoder::new(&mut cursor);
        encoder
            .write_image(pixels, width, height, color.into())
            .map_err(|e| SceneError::Other(format!("PNG encode error: {}", e)))?;
    }
    Ok(buf)
}

#[cfg(not(feature = "image"))]
fn encode_pixels_png(_width: u32, _height: u32, _pixels: &[u8]) -> Result<Vec<u8>> {
    Err(SceneError::NotSupported(
        "PNG encoding requires the `image` feature".into(),
    ))
}

/// Save a RenderFrame::Pixels as a PNG file at the given path.
/// Requires the `image` feature; otherwise returns NotSupported.
pub fn save_png<P: AsRef<std::path::Path>>(path: P, frame: &RenderFrame) -> Result<()> {
    let bytes = encode_png(frame)?;
    std::fs::write(path.as_ref(), &bytes)
        .map_err(|e| SceneError::Other(format!("Failed to write PNG: {}", e)))?;
    log::info!("wrote {} ({} bytes)", path.as_ref().display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_frame() -> RenderFrame {
        RenderFrame::Pixels { width: 2, height: 2, data: vec![255, 0, 0, 255,  0, 255, 0, 255,  0, 0, 255, 255,  255, 255, 255, 255] }
    }

    #[test]
    fn export_filename_encodes_seed() {
        assert_eq!(export_filename(42), "generated-boat-42.png");
        assert_eq!(export_filename(0), "generated-boat-0.png");
    }

    #[cfg(not(feature = "image"))]
    #[test]
    fn encode_png_without_feature_not_supported() {
        let err = encode_png(&tiny_frame()).unwrap_err();
        match err {
            SceneError::NotSupported(_) => {}
            other => panic!("Expected NotSupported, got {:?}", other),
        }
    }

    #[cfg(feature = "image")]
    #[test]
    fn encode_png_with_feature_produces_png_signature() {
        let bytes = encode_png(&tiny_frame()).expect("PNG encoding should succeed");
        assert_eq!(&bytes[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[cfg(feature = "image")]
    #[test]
    fn encode_png_rejects_mismatched_length() {
        let frame = RenderFrame::Pixels { width: 3, height: 3, data: vec![0; 10] };
        assert!(matches!(encode_png(&frame), Err(SceneError::InvalidFrame(_))));
    }
}
