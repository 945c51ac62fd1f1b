use crate::{
    assets::codec::{PngCodec, RasterCodec},
    foundation::{core::Frame, error::LoopFxResult, math::mul_div255_u8},
    fx::effect::EffectInstance,
    render::buffer_pool::BufferPool,
};

/// Size of a host layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// The host's view of one image layer, exchanged as encoded bytes.
pub trait Layer {
    /// Current size.
    fn info(&self) -> LayerInfo;

    /// Encoded contents.
    fn to_buffer(&self) -> LoopFxResult<Vec<u8>>;

    /// Replace the contents with encoded bytes.
    fn from_buffer(&mut self, bytes: &[u8]) -> LoopFxResult<()>;

    /// Multiply the layer alpha by `factor`, clamped into `[0, 1]`.
    fn adjust_layer_opacity(&mut self, factor: f64);
}

/// A layer held in memory as a decoded [`Frame`], encoded on demand.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryLayer<C = PngCodec> {
    frame: Frame,
    codec: C,
}

impl MemoryLayer<PngCodec> {
    /// Wrap `frame`, exchanging PNG bytes.
    pub fn new(frame: Frame) -> Self {
        Self::with_codec(frame, PngCodec)
    }
}

impl<C: RasterCodec> MemoryLayer<C> {
    /// Wrap `frame`, exchanging bytes in `codec`'s format.
    pub fn with_codec(frame: Frame, codec: C) -> Self {
        Self { frame, codec }
    }

    /// Decoded contents.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Take the decoded contents.
    pub fn into_frame(self) -> Frame {
        self.frame
    }
}

impl<C: RasterCodec> Layer for MemoryLayer<C> {
    fn info(&self) -> LayerInfo {
        LayerInfo {
            width: self.frame.width,
            height: self.frame.height,
        }
    }

    fn to_buffer(&self) -> LoopFxResult<Vec<u8>> {
        self.codec.encode(&self.frame)
    }

    fn from_buffer(&mut self, bytes: &[u8]) -> LoopFxResult<()> {
        self.frame = self.codec.decode(bytes)?;
        Ok(())
    }

    fn adjust_layer_opacity(&mut self, factor: f64) {
        let f = if factor.is_finite() { factor.clamp(0.0, 1.0) } else { 1.0 };
        let k = (f * 255.0).round() as u16;
        if k == 255 {
            return;
        }
        for px in self.frame.data.chunks_exact_mut(4) {
            px[3] = mul_div255_u8(u16::from(px[3]), k);
        }
    }
}

/// Decode `layer`, render frame `frame` of `total` with `instance`, and write the result back.
///
/// On error the layer is left untouched.
#[tracing::instrument(skip(instance, layer, codec, pool), fields(effect = instance.id()))]
pub fn apply_to_layer(
    instance: &EffectInstance,
    layer: &mut dyn Layer,
    codec: &dyn RasterCodec,
    pool: &BufferPool,
    frame: u64,
    total: u64,
) -> LoopFxResult<()> {
    let input = codec.decode(&layer.to_buffer()?)?;
    let info = layer.info();
    if (input.width, input.height) != (info.width, info.height) {
        tracing::debug!(
            ?info,
            width = input.width,
            height = input.height,
            "decoded size differs from layer info"
        );
    }
    let output = instance.invoke(&input, frame, total, pool)?;
    let encoded = codec.encode(&output)?;
    pool.recycle(output);
    pool.recycle(input);
    layer.from_buffer(&encoded)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/layer.rs"]
mod tests;
