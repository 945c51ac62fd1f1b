use crate::{
    config::params::{EffectConfig, ParamSpec},
    effects::blur::{add_glow, box_blur, bright_pass},
    eval::context::FrameContext,
    foundation::{
        core::{Frame, RGBA_CHANNELS},
        error::LoopFxResult,
        math::to_u8,
    },
    fx::effect::{Effect, EffectMetadata, PRESERVE_ALPHA, Pulse, StaticSettings, passthrough},
    render::buffer_pool::BufferPool,
};

const PARAMS: &[ParamSpec] = &[
    ParamSpec::float("threshold", 0.0, 1.0, 0.7, "Luma above which pixels glow"),
    ParamSpec::int("radius", 0, 64, 6, "Box blur radius in pixels"),
    ParamSpec::float("intensity", 0.0, 4.0, 1.0, "Glow gain"),
    ParamSpec::flag("pulse", false, "Modulate the glow over the loop"),
    ParamSpec::float("pulse_cycles", -16.0, 16.0, 1.0, "Pulses per loop"),
    ParamSpec::float("pulse_amplitude", 0.0, 1.0, 0.3, "Pulse depth"),
    PRESERVE_ALPHA,
];

static METADATA: EffectMetadata = EffectMetadata {
    id: "bloom",
    name: "Bloom",
    description: "Blurred bright-pass glow added back onto the image",
    params: PARAMS,
};

/// Bright-pass, box blur, additive merge.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bloom;

/// Resolved bloom parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct BloomData {
    threshold: f64,
    radius: u32,
    intensity: f64,
    pulse: Option<Pulse>,
    preserve_alpha: bool,
}

impl Effect for Bloom {
    type Data = BloomData;

    fn metadata(&self) -> &'static EffectMetadata {
        &METADATA
    }

    fn precompute(&self, config: &EffectConfig, _settings: &StaticSettings) -> BloomData {
        BloomData {
            threshold: config.f64("threshold"),
            radius: config.i64("radius").clamp(0, 64) as u32,
            intensity: config.f64("intensity"),
            pulse: config.flag("pulse").then(|| {
                Pulse::new(config.f64("pulse_cycles"), config.f64("pulse_amplitude"))
            }),
            preserve_alpha: config.flag("preserve_alpha"),
        }
    }

    fn invoke(
        &self,
        data: &BloomData,
        input: &Frame,
        ctx: FrameContext,
        pool: &BufferPool,
    ) -> LoopFxResult<Frame> {
        input.check()?;
        let gain = data.intensity * data.pulse.map_or(1.0, |p| p.gain(ctx));
        if gain <= 0.0 {
            return Ok(passthrough(input, pool));
        }

        let (w, h) = (input.width, input.height);
        let mut bright = pool.acquire(w, h, 3);
        let lit = bright_pass(&input.data, &mut bright, data.threshold)?;
        if lit == 0 {
            tracing::trace!("bloom: nothing above threshold");
            return Ok(passthrough(input, pool));
        }

        let mut tmp = pool.acquire(w, h, 3);
        let mut glow = pool.acquire(w, h, 3);
        box_blur(&bright, &mut tmp, &mut glow, w, h, 3, data.radius)?;

        let mut out = pool.acquire(w, h, RGBA_CHANNELS);
        out.copy_from_slice(&input.data);
        add_glow(&mut out, &glow, gain)?;

        if !data.preserve_alpha {
            for (px, g) in out.chunks_exact_mut(4).zip(glow.chunks_exact(3)) {
                let peak = f64::from(g[0].max(g[1]).max(g[2])) * gain;
                px[3] = px[3].max(to_u8(peak));
            }
        }
        Ok(out.into_frame())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fx/bloom.rs"]
mod tests;
