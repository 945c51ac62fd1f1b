use crate::{
    config::params::{EffectConfig, ParamSpec},
    eval::{context::FrameContext, phase::LoopCycles},
    foundation::{
        core::{Frame, RGBA_CHANNELS},
        error::LoopFxResult,
    },
    render::buffer_pool::BufferPool,
};

/// `preserve_alpha`, carried by every built-in effect.
pub(crate) const PRESERVE_ALPHA: ParamSpec = ParamSpec::flag(
    "preserve_alpha",
    true,
    "Copy input alpha through unchanged",
);

/// Optional target dimensions an effect is prepared against.
///
/// Missing dimensions fall back to the dimensions of the raster passed to each invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct StaticSettings {
    /// Target width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Target height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl StaticSettings {
    /// Settings with both dimensions known.
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// Both dimensions, when both are set and nonzero.
    pub fn size(self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }

    /// Fill in missing dimensions.
    pub fn or_size(self, width: u32, height: u32) -> Self {
        Self {
            width: self.width.or(Some(width)),
            height: self.height.or(Some(height)),
        }
    }
}

/// Static description of an effect.
#[derive(Debug)]
pub struct EffectMetadata {
    /// Registry id.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Declared parameters.
    pub params: &'static [ParamSpec],
}

/// A loop effect: immutable precomputation plus a per-frame pixel transform.
pub trait Effect: Default + Send + Sync + 'static {
    /// Immutable data derived once from configuration and settings.
    type Data: Send + Sync + 'static;

    /// Static description, including the parameter table.
    fn metadata(&self) -> &'static EffectMetadata;

    /// Derive the effect data. Must not depend on time or frame index.
    fn precompute(&self, config: &EffectConfig, settings: &StaticSettings) -> Self::Data;

    /// Render `ctx` for `input`. Working buffers come from `pool` and are returned before
    /// this call completes, on success and on error alike.
    fn invoke(
        &self,
        data: &Self::Data,
        input: &Frame,
        ctx: FrameContext,
        pool: &BufferPool,
    ) -> LoopFxResult<Frame>;
}

trait PreparedEffect: Send + Sync {
    fn metadata(&self) -> &'static EffectMetadata;
    fn invoke(&self, input: &Frame, ctx: FrameContext, pool: &BufferPool) -> LoopFxResult<Frame>;
}

struct Prepared<E: Effect> {
    effect: E,
    data: E::Data,
}

impl<E: Effect> PreparedEffect for Prepared<E> {
    fn metadata(&self) -> &'static EffectMetadata {
        self.effect.metadata()
    }

    fn invoke(&self, input: &Frame, ctx: FrameContext, pool: &BufferPool) -> LoopFxResult<Frame> {
        self.effect.invoke(&self.data, input, ctx, pool)
    }
}

/// A configured effect ready to render frames.
///
/// Construction runs `precompute` exactly once; afterwards the instance is immutable and may be
/// shared across threads.
pub struct EffectInstance {
    config: EffectConfig,
    settings: StaticSettings,
    prepared: Box<dyn PreparedEffect>,
}

impl std::fmt::Debug for EffectInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectInstance")
            .field("id", &self.id())
            .field("config", &self.config)
            .field("settings", &self.settings)
            .finish()
    }
}

impl EffectInstance {
    /// Precompute `effect` for `config` and `settings`.
    pub fn new<E: Effect>(effect: E, config: EffectConfig, settings: StaticSettings) -> Self {
        let data = effect.precompute(&config, &settings);
        tracing::debug!(
            effect = effect.metadata().id,
            fingerprint = config.fingerprint(),
            "effect precomputed"
        );
        Self {
            config,
            settings,
            prepared: Box::new(Prepared { effect, data }),
        }
    }

    /// Registry id of the underlying effect.
    pub fn id(&self) -> &'static str {
        self.prepared.metadata().id
    }

    /// Static description of the underlying effect.
    pub fn metadata(&self) -> &'static EffectMetadata {
        self.prepared.metadata()
    }

    /// Normalized configuration.
    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Settings the instance was prepared against.
    pub fn settings(&self) -> StaticSettings {
        self.settings
    }

    /// Render frame `frame` of a loop of `total` frames.
    #[tracing::instrument(skip(self, input, pool), fields(effect = self.id()))]
    pub fn invoke(
        &self,
        input: &Frame,
        frame: u64,
        total: u64,
        pool: &BufferPool,
    ) -> LoopFxResult<Frame> {
        input.check()?;
        self.prepared.invoke(input, FrameContext::new(frame, total), pool)
    }
}

/// Sinusoidal gain `1 + sin(phase)·amplitude` over a whole number of cycles per loop.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Pulse {
    pub cycles: LoopCycles,
    pub amplitude: f64,
}

impl Pulse {
    pub fn new(nominal_cycles: f64, amplitude: f64) -> Self {
        Self {
            cycles: LoopCycles::resolve(nominal_cycles),
            amplitude,
        }
    }

    pub fn gain(self, ctx: FrameContext) -> f64 {
        if self.amplitude == 0.0 || self.cycles.get() == 0 {
            return 1.0;
        }
        1.0 + self.cycles.phase(ctx).sin() * self.amplitude
    }
}

/// Copy of `input` in a pooled buffer, for effects whose parameters make them a no-op.
pub(crate) fn passthrough(input: &Frame, pool: &BufferPool) -> Frame {
    let mut out = pool.acquire(input.width, input.height, RGBA_CHANNELS);
    out.copy_from_slice(&input.data);
    out.into_frame()
}

#[cfg(test)]
#[path = "../../tests/unit/fx/effect.rs"]
mod tests;
