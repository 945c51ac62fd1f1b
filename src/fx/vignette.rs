use crate::{
    config::{
        color::parse_color_or_white,
        params::{EffectConfig, ParamSpec},
    },
    effects::blend::{Vignette as VignetteShape, apply_vignette},
    eval::context::FrameContext,
    foundation::{
        core::{Frame, RGBA_CHANNELS},
        error::LoopFxResult,
    },
    fx::effect::{Effect, EffectMetadata, PRESERVE_ALPHA, Pulse, StaticSettings, passthrough},
    render::buffer_pool::BufferPool,
};

const PARAMS: &[ParamSpec] = &[
    ParamSpec::float("strength", 0.0, 1.0, 0.5, "Edge darkening"),
    ParamSpec::float("roundness", 0.0, 1.0, 1.0, "0 = rectangular, 1 = circular"),
    ParamSpec::color("color", "#000000", "Color the edges fall toward"),
    ParamSpec::float("pulse_cycles", -16.0, 16.0, 0.0, "Breaths per loop"),
    ParamSpec::float("pulse_amplitude", 0.0, 1.0, 0.0, "Breath depth"),
    PRESERVE_ALPHA,
];

static METADATA: EffectMetadata = EffectMetadata {
    id: "vignette",
    name: "Vignette",
    description: "Edge falloff toward a color, optionally breathing over the loop",
    params: PARAMS,
};

/// Pulsing edge falloff.
#[derive(Clone, Copy, Debug, Default)]
pub struct Vignette;

/// Resolved vignette parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct VignetteData {
    shape: VignetteShape,
    pulse: Pulse,
    preserve_alpha: bool,
}

impl Effect for Vignette {
    type Data = VignetteData;

    fn metadata(&self) -> &'static EffectMetadata {
        &METADATA
    }

    fn precompute(&self, config: &EffectConfig, _settings: &StaticSettings) -> VignetteData {
        VignetteData {
            shape: VignetteShape {
                strength: config.f64("strength"),
                roundness: config.f64("roundness"),
                color: parse_color_or_white(config.text("color")),
            },
            pulse: Pulse::new(config.f64("pulse_cycles"), config.f64("pulse_amplitude")),
            preserve_alpha: config.flag("preserve_alpha"),
        }
    }

    fn invoke(
        &self,
        data: &VignetteData,
        input: &Frame,
        ctx: FrameContext,
        pool: &BufferPool,
    ) -> LoopFxResult<Frame> {
        input.check()?;
        if data.shape.strength == 0.0 {
            return Ok(passthrough(input, pool));
        }
        let mut out = pool.acquire(input.width, input.height, RGBA_CHANNELS);
        out.copy_from_slice(&input.data);
        apply_vignette(
            &mut out,
            input.width,
            input.height,
            &data.shape,
            data.pulse.gain(ctx),
            !data.preserve_alpha,
        );
        Ok(out.into_frame())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fx/vignette.rs"]
mod tests;
