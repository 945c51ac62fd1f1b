use std::io::Cursor;

use anyhow::Context;

use crate::foundation::{
    core::Frame,
    error::{LoopFxError, LoopFxResult},
};

/// Encoded bytes ⇄ straight-alpha RGBA8 [`Frame`].
pub trait RasterCodec: Send + Sync {
    /// Decode to RGBA8. Sources without alpha come back opaque.
    fn decode(&self, bytes: &[u8]) -> LoopFxResult<Frame>;

    /// Encode an RGBA8 frame.
    fn encode(&self, frame: &Frame) -> LoopFxResult<Vec<u8>>;
}

/// PNG through the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngCodec;

impl RasterCodec for PngCodec {
    fn decode(&self, bytes: &[u8]) -> LoopFxResult<Frame> {
        let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .context("decode png from memory")
            .map_err(|e| LoopFxError::codec(format!("{e:#}")))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Frame::new(width, height, rgba.into_raw())
    }

    fn encode(&self, frame: &Frame) -> LoopFxResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
            .ok_or_else(|| {
                LoopFxError::codec(format!(
                    "frame data does not fit {}x{} rgba",
                    frame.width, frame.height
                ))
            })?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| LoopFxError::codec(format!("encode png: {e}")))?;
        Ok(buf)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/codec.rs"]
mod tests;
