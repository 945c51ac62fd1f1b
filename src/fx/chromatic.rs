use crate::{
    config::params::{EffectConfig, ParamSpec},
    eval::{context::FrameContext, phase::LoopCycles},
    field::flow::chromatic_orbit,
    foundation::{
        core::{Frame, RGBA_CHANNELS},
        error::LoopFxResult,
    },
    fx::{
        effect::{Effect, EffectMetadata, PRESERVE_ALPHA, StaticSettings, passthrough},
        geometry::Geometry,
        warp::{EDGE, SAMPLING, Sampling, displace_channels},
    },
    render::buffer_pool::BufferPool,
};

const PARAMS: &[ParamSpec] = &[
    ParamSpec::float("radius", 0.0, 100.0, 4.0, "Channel offset in pixels"),
    ParamSpec::float("rotation_cycles", -16.0, 16.0, 1.0, "Orbit turns per loop"),
    ParamSpec::float("red_phase", -360.0, 360.0, 0.0, "Red orbit phase in degrees"),
    ParamSpec::float("green_phase", -360.0, 360.0, 120.0, "Green orbit phase in degrees"),
    ParamSpec::float("blue_phase", -360.0, 360.0, 240.0, "Blue orbit phase in degrees"),
    EDGE,
    SAMPLING,
    PRESERVE_ALPHA,
];

static METADATA: EffectMetadata = EffectMetadata {
    id: "chromatic_orbit",
    name: "Chromatic orbit",
    description: "Color channels sampled on rotating offsets around the frame centre",
    params: PARAMS,
};

/// Per-channel orbiting offsets.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChromaticOrbit;

/// Resolved chromatic orbit parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct ChromaticData {
    radius: f64,
    rotation: LoopCycles,
    channel_phases: [f64; 3],
    sampling: Sampling,
    preserve_alpha: bool,
    geometry: Option<Geometry>,
}

impl Effect for ChromaticOrbit {
    type Data = ChromaticData;

    fn metadata(&self) -> &'static EffectMetadata {
        &METADATA
    }

    fn precompute(&self, config: &EffectConfig, settings: &StaticSettings) -> ChromaticData {
        ChromaticData {
            radius: config.f64("radius"),
            rotation: LoopCycles::resolve(config.f64("rotation_cycles")),
            channel_phases: ["red_phase", "green_phase", "blue_phase"]
                .map(|k| config.f64(k).to_radians()),
            sampling: Sampling::from_config(config),
            preserve_alpha: config.flag("preserve_alpha"),
            geometry: Geometry::from_settings(settings),
        }
    }

    fn invoke(
        &self,
        data: &ChromaticData,
        input: &Frame,
        ctx: FrameContext,
        pool: &BufferPool,
    ) -> LoopFxResult<Frame> {
        input.check()?;
        if data.radius == 0.0 {
            return Ok(passthrough(input, pool));
        }
        let geom = Geometry::for_frame(data.geometry, input.width, input.height);
        let rotation = data.rotation.phase(ctx);

        let mut out = pool.acquire(input.width, input.height, RGBA_CHANNELS);
        displace_channels(input, &mut out, data.sampling, data.preserve_alpha, |p| {
            chromatic_orbit(p, geom.center, rotation, &data.channel_phases, data.radius)
        })?;
        Ok(out.into_frame())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fx/chromatic.rs"]
mod tests;
