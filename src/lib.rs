//! loopfx renders deterministic, seamlessly looping raster effects.
//!
//! An effect is looked up in an [`EffectRegistry`], configured from a flat JSON object, and
//! precomputed once into an [`EffectInstance`]. Each frame is then a pure function of the input
//! [`Frame`], the frame index and the loop length:
//!
//! - every periodic quantity runs a whole number of cycles per loop, so frame `total` is
//!   bit-identical to frame 0
//! - working buffers are borrowed from a [`BufferPool`] and returned on every exit path
//! - instances are immutable and `Send + Sync`, so a loop can be rendered in parallel
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod effects;
mod eval;
mod field;
mod foundation;
mod fx;
mod render;

pub use crate::foundation::core::{Frame, Point, RGBA_CHANNELS, RasterView, Rgb8, Vec2};
pub use crate::foundation::error::{LoopFxError, LoopFxResult};

pub use crate::assets::codec::{PngCodec, RasterCodec};
pub use crate::assets::layer::{Layer, LayerInfo, MemoryLayer, apply_to_layer};
pub use crate::config::color::{parse_color_or_white, parse_hex_rgb};
pub use crate::config::params::{EffectConfig, ParamKind, ParamSpec, ParamValue};
pub use crate::config::preset::EffectPreset;
pub use crate::effects::blend::{
    BlendFn, BlendMode, HueRotation, TintLut, Vignette as VignetteShape, add, apply_vignette,
    normal, overlay, screen, vignette_falloff,
};
pub use crate::effects::blur::{add_glow, box_blur, bright_pass, luma};
pub use crate::eval::context::FrameContext;
pub use crate::eval::phase::{LoopCycles, PhaseSet, phase_delta};
pub use crate::field::flow::{RippleField, Vortex, chromatic_orbit, polar_ripple, vortex_flow};
pub use crate::field::grating::{GratingPhases, Gratings, grating_response};
pub use crate::field::hash::{hash_u32, hash2, hash3, hash3_signed};
pub use crate::field::noise::{fade, fractal_noise3, lattice_noise3};
pub use crate::fx::bloom::Bloom;
pub use crate::fx::chromatic::ChromaticOrbit;
pub use crate::fx::echo::Echo;
pub use crate::fx::effect::{Effect, EffectInstance, EffectMetadata, StaticSettings};
pub use crate::fx::grain::Grain;
pub use crate::fx::interference::Interference;
pub use crate::fx::registry::{EffectDescriptor, EffectRegistry};
pub use crate::fx::ripple::Ripple;
pub use crate::fx::vignette::Vignette;
pub use crate::fx::vortex::VortexFlow;
pub use crate::render::buffer_pool::{
    BufferPool, BufferPoolOpts, BufferPoolStats, BufferShape, PooledBuffer,
};
pub use crate::render::pipeline::{
    LoopClosureReport, RenderStats, RenderThreading, frame_digest, render_frame, render_loop,
    verify_loop_closure,
};
pub use crate::render::sample::{EdgeMode, SampleMode, resolve, sample, sample_rgba};
