use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::{
    config::params::{EffectConfig, ParamSpec},
    eval::{context::FrameContext, phase::LoopCycles},
    field::{
        flow::{Vortex, vortex_flow},
        hash::hash3,
    },
    foundation::{
        core::{Frame, RGBA_CHANNELS},
        error::LoopFxResult,
        math::TAU,
    },
    fx::{
        effect::{Effect, EffectMetadata, PRESERVE_ALPHA, StaticSettings, passthrough},
        geometry::Geometry,
        warp::{EDGE, SAMPLING, Sampling, displace},
    },
    render::buffer_pool::BufferPool,
};

const PARAMS: &[ParamSpec] = &[
    ParamSpec::int("count", 0, 16, 4, "Number of vortices"),
    ParamSpec::float("strength", -200.0, 200.0, 12.0, "Peak swirl in pixels"),
    ParamSpec::float("influence", 0.01, 2.0, 0.35, "Radius of influence, times the shorter side"),
    ParamSpec::float("orbit", 0.0, 0.5, 0.1, "Orbit radius of each centre, times the shorter side"),
    ParamSpec::float("cycles", -16.0, 16.0, 1.0, "Orbits per loop"),
    ParamSpec::int("seed", 0, 2_147_483_647, 1, "Placement seed"),
    EDGE,
    SAMPLING,
    PRESERVE_ALPHA,
];

static METADATA: EffectMetadata = EffectMetadata {
    id: "vortex",
    name: "Vortex flow",
    description: "Superposed swirling point vortices orbiting seeded anchors",
    params: PARAMS,
};

/// Seeded point vortices whose centres orbit once per cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct VortexFlow;

/// A vortex placed by the seed, before the per-frame orbit.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Anchor {
    /// Position as a fraction of the pixel lattice.
    at: (f64, f64),
    /// Signed strength factor in `[-1, -0.5] ∪ [0.5, 1]`.
    spin: f64,
    orbit_offset: f64,
}

/// Resolved vortex parameters and seeded anchors.
#[derive(Clone, Debug, PartialEq)]
pub struct VortexData {
    anchors: SmallVec<[Anchor; 8]>,
    strength: f64,
    influence: f64,
    orbit: f64,
    cycles: LoopCycles,
    sampling: Sampling,
    preserve_alpha: bool,
    geometry: Option<Geometry>,
}

fn anchors(count: i64, seed: i32) -> SmallVec<[Anchor; 8]> {
    (0..count as i32)
        .map(|i| {
            let x = 0.15 + 0.7 * hash3(seed, i, 1);
            let y = 0.15 + 0.7 * hash3(seed, i, 2);
            let sign = if hash3(seed, i, 3) < 0.5 { -1.0 } else { 1.0 };
            Anchor {
                at: (x, y),
                spin: sign * (0.5 + 0.5 * hash3(seed, i, 4)),
                orbit_offset: TAU * hash3(seed, i, 5),
            }
        })
        .collect()
}

impl Effect for VortexFlow {
    type Data = VortexData;

    fn metadata(&self) -> &'static EffectMetadata {
        &METADATA
    }

    fn precompute(&self, config: &EffectConfig, settings: &StaticSettings) -> VortexData {
        let seed = config.i64("seed").clamp(0, i64::from(i32::MAX)) as i32;
        VortexData {
            anchors: anchors(config.i64("count").clamp(0, 16), seed),
            strength: config.f64("strength"),
            influence: config.f64("influence"),
            orbit: config.f64("orbit"),
            cycles: LoopCycles::resolve(config.f64("cycles")),
            sampling: Sampling::from_config(config),
            preserve_alpha: config.flag("preserve_alpha"),
            geometry: Geometry::from_settings(settings),
        }
    }

    fn invoke(
        &self,
        data: &VortexData,
        input: &Frame,
        ctx: FrameContext,
        pool: &BufferPool,
    ) -> LoopFxResult<Frame> {
        input.check()?;
        if data.strength == 0.0 || data.anchors.is_empty() {
            return Ok(passthrough(input, pool));
        }
        let geom = Geometry::for_frame(data.geometry, input.width, input.height);
        let phase = data.cycles.phase(ctx);
        let orbit = data.orbit * geom.min_dim;

        let vortices: SmallVec<[Vortex; 8]> = data
            .anchors
            .iter()
            .map(|a| {
                let base: Point = geom.at_fraction(a.at.0, a.at.1);
                Vortex {
                    center: base + Vec2::from_angle(phase + a.orbit_offset) * orbit,
                    strength: data.strength * a.spin,
                }
            })
            .collect();
        let max_radius = data.influence * geom.min_dim;

        let mut out = pool.acquire(input.width, input.height, RGBA_CHANNELS);
        displace(input, &mut out, data.sampling, data.preserve_alpha, |p| {
            vortex_flow(p, &vortices, max_radius)
        })?;
        Ok(out.into_frame())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fx/vortex.rs"]
mod tests;
