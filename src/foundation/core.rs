use crate::foundation::error::{LoopFxError, LoopFxResult};

pub use kurbo::{Point, Vec2};

/// Number of interleaved channels in a [`Frame`] (R, G, B, A).
pub const RGBA_CHANNELS: usize = 4;

/// Byte length of a `width × height × channels` raster, or an error on overflow.
pub(crate) fn raster_len(width: u32, height: u32, channels: usize) -> LoopFxResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| LoopFxError::evaluation("raster size overflow"))
}

/// An RGBA8 raster with straight (non-premultiplied) alpha.
///
/// This is both the input and the output type of every effect invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl Frame {
    /// Wrap `data`, checking that it holds exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> LoopFxResult<Self> {
        let frame = Self {
            width,
            height,
            data,
        };
        frame.check()?;
        Ok(frame)
    }

    /// Check that `data` still holds exactly `width * height * 4` bytes.
    ///
    /// The fields are public, so a frame can drift out of shape after [`Frame::new`].
    pub fn check(&self) -> LoopFxResult<()> {
        let expected = raster_len(self.width, self.height, RGBA_CHANNELS)?;
        if self.data.len() != expected {
            return Err(LoopFxError::validation(format!(
                "frame has {} bytes, expected {expected} for {}x{}",
                self.data.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    /// A frame where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let n = (width as usize) * (height as usize);
        Self {
            width,
            height,
            data: rgba.repeat(n),
        }
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * RGBA_CHANNELS;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Borrow as a read-only [`RasterView`].
    pub fn view(&self) -> RasterView<'_> {
        RasterView {
            data: &self.data,
            width: self.width,
            height: self.height,
            channels: RGBA_CHANNELS,
        }
    }
}

/// Borrowed interleaved raster of any channel count.
#[derive(Clone, Copy, Debug)]
pub struct RasterView<'a> {
    /// Interleaved channel bytes.
    pub data: &'a [u8],
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channels per pixel.
    pub channels: usize,
}

impl<'a> RasterView<'a> {
    /// Build a view, checking the buffer length against the shape.
    pub fn new(data: &'a [u8], width: u32, height: u32, channels: usize) -> LoopFxResult<Self> {
        let expected = raster_len(width, height, channels)?;
        if data.len() != expected {
            return Err(LoopFxError::validation(format!(
                "raster view expects {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    #[inline]
    pub(crate) fn at(&self, x: u32, y: u32, channel: usize) -> u8 {
        self.data[((y as usize) * (self.width as usize) + (x as usize)) * self.channels + channel]
    }
}

/// An opaque RGB color triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb8 {
    /// White, the fallback for malformed color strings.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as `f64` in `0..=255`.
    pub fn channels_f64(self) -> [f64; 3] {
        [f64::from(self.r), f64::from(self.g), f64::from(self.b)]
    }

    /// `#RRGGBB` form.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
