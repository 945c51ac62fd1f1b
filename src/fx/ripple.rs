use crate::{
    config::params::{EffectConfig, ParamSpec},
    eval::{context::FrameContext, phase::LoopCycles},
    foundation::{
        core::{Frame, RGBA_CHANNELS},
        error::LoopFxResult,
    },
    field::flow::{RippleField, polar_ripple},
    fx::{
        effect::{Effect, EffectMetadata, PRESERVE_ALPHA, StaticSettings, passthrough},
        geometry::Geometry,
        warp::{EDGE, SAMPLING, Sampling, displace},
    },
    render::buffer_pool::BufferPool,
};

const PARAMS: &[ParamSpec] = &[
    ParamSpec::float("amplitude", 0.0, 200.0, 8.0, "Peak displacement in pixels"),
    ParamSpec::int("frequency", 0, 32, 6, "Angular lobes per turn"),
    ParamSpec::float("radial_cycles", 0.0, 32.0, 3.0, "Rings from centre to corner"),
    ParamSpec::float("cycles", -16.0, 16.0, 1.0, "Wave travel per loop"),
    ParamSpec::float("center_x", 0.0, 1.0, 0.5, "Horizontal origin as a fraction of width"),
    ParamSpec::float("center_y", 0.0, 1.0, 0.5, "Vertical origin as a fraction of height"),
    EDGE,
    SAMPLING,
    PRESERVE_ALPHA,
];

static METADATA: EffectMetadata = EffectMetadata {
    id: "ripple",
    name: "Polar ripple",
    description: "Radial wave displacement travelling outward from a centre",
    params: PARAMS,
};

/// Radial sine displacement around a configurable origin.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ripple;

/// Resolved ripple parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct RippleData {
    amplitude: f64,
    frequency: f64,
    radial_cycles: f64,
    cycles: LoopCycles,
    center: (f64, f64),
    sampling: Sampling,
    preserve_alpha: bool,
    geometry: Option<Geometry>,
}

impl Effect for Ripple {
    type Data = RippleData;

    fn metadata(&self) -> &'static EffectMetadata {
        &METADATA
    }

    fn precompute(&self, config: &EffectConfig, settings: &StaticSettings) -> RippleData {
        RippleData {
            amplitude: config.f64("amplitude"),
            frequency: config.i64("frequency") as f64,
            radial_cycles: config.f64("radial_cycles"),
            cycles: LoopCycles::resolve(config.f64("cycles")),
            center: (config.f64("center_x"), config.f64("center_y")),
            sampling: Sampling::from_config(config),
            preserve_alpha: config.flag("preserve_alpha"),
            geometry: Geometry::from_settings(settings),
        }
    }

    fn invoke(
        &self,
        data: &RippleData,
        input: &Frame,
        ctx: FrameContext,
        pool: &BufferPool,
    ) -> LoopFxResult<Frame> {
        input.check()?;
        if data.amplitude == 0.0 {
            return Ok(passthrough(input, pool));
        }
        let geom = Geometry::for_frame(data.geometry, input.width, input.height);
        let field = RippleField {
            center: geom.at_fraction(data.center.0, data.center.1),
            half_diag: geom.half_diag,
            frequency: data.frequency,
            radial_cycles: data.radial_cycles,
            amplitude: data.amplitude,
        };
        // Outward travel: the phase is subtracted from the radial term.
        let phase = -data.cycles.phase(ctx);

        let mut out = pool.acquire(input.width, input.height, RGBA_CHANNELS);
        displace(input, &mut out, data.sampling, data.preserve_alpha, |p| {
            polar_ripple(p, &field, phase)
        })?;
        Ok(out.into_frame())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fx/ripple.rs"]
mod tests;
