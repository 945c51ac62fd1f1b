use kurbo::Vec2;

use crate::{
    config::params::{EffectConfig, ParamSpec},
    eval::{context::FrameContext, phase::LoopCycles},
    field::{hash::hash3_signed, noise::fractal_noise3},
    foundation::{
        core::{Frame, RGBA_CHANNELS},
        error::LoopFxResult,
        math::to_u8,
    },
    fx::{
        effect::{Effect, EffectMetadata, PRESERVE_ALPHA, StaticSettings, passthrough},
        warp::{Sampling, displace},
    },
    render::buffer_pool::BufferPool,
};

const PARAMS: &[ParamSpec] = &[
    ParamSpec::float("amount", 0.0, 1.0, 0.1, "Grain strength"),
    ParamSpec::flag("monochrome", true, "Same grain on every channel"),
    ParamSpec::int("seed", 0, 2_147_483_647, 1, "Grain seed"),
    ParamSpec::float("drift_scale", 1.0, 512.0, 64.0, "Drift noise feature size in pixels"),
    ParamSpec::float("drift_amount", 0.0, 50.0, 0.0, "Drift displacement in pixels"),
    ParamSpec::float("drift_cycles", -16.0, 16.0, 1.0, "Drift circuits per loop"),
    PRESERVE_ALPHA,
];

static METADATA: EffectMetadata = EffectMetadata {
    id: "grain",
    name: "Film grain",
    description: "Per-frame hashed grain over an optional looping noise drift",
    params: PARAMS,
};

// Radius of the drift circuit in noise-lattice units.
const DRIFT_ORBIT: f64 = 1.5;
const DRIFT_OCTAVES: u32 = 2;

/// Hashed grain with looping noise drift.
#[derive(Clone, Copy, Debug, Default)]
pub struct Grain;

/// Resolved grain parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct GrainData {
    amplitude: f64,
    monochrome: bool,
    seed: i32,
    drift_scale: f64,
    drift_amount: f64,
    drift_cycles: LoopCycles,
    preserve_alpha: bool,
}

impl Effect for Grain {
    type Data = GrainData;

    fn metadata(&self) -> &'static EffectMetadata {
        &METADATA
    }

    fn precompute(&self, config: &EffectConfig, _settings: &StaticSettings) -> GrainData {
        GrainData {
            amplitude: config.f64("amount") * 127.5,
            monochrome: config.flag("monochrome"),
            seed: config.i64("seed").clamp(0, i64::from(i32::MAX)) as i32,
            drift_scale: config.f64("drift_scale").max(1.0),
            drift_amount: config.f64("drift_amount"),
            drift_cycles: LoopCycles::resolve(config.f64("drift_cycles")),
            preserve_alpha: config.flag("preserve_alpha"),
        }
    }

    fn invoke(
        &self,
        data: &GrainData,
        input: &Frame,
        ctx: FrameContext,
        pool: &BufferPool,
    ) -> LoopFxResult<Frame> {
        input.check()?;
        if data.amplitude == 0.0 && data.drift_amount == 0.0 {
            return Ok(passthrough(input, pool));
        }

        let mut out = pool.acquire(input.width, input.height, RGBA_CHANNELS);
        if data.drift_amount > 0.0 {
            let orbit = Vec2::from_angle(data.drift_cycles.phase(ctx)) * DRIFT_ORBIT;
            let (sx, sy) = (data.seed, data.seed.wrapping_add(1));
            displace(input, &mut out, Sampling::default(), data.preserve_alpha, |p| {
                let nx = p.x / data.drift_scale + orbit.x;
                let ny = p.y / data.drift_scale + orbit.y;
                let dx = fractal_noise3(nx, ny, 0.0, sx, DRIFT_OCTAVES) * 2.0 - 1.0;
                let dy = fractal_noise3(nx, ny, 0.0, sy, DRIFT_OCTAVES) * 2.0 - 1.0;
                Vec2::new(dx, dy) * data.drift_amount
            })?;
        } else {
            out.copy_from_slice(&input.data);
        }

        if data.amplitude > 0.0 && input.width > 0 {
            // Keyed by the loop frame so frame `total` repeats frame 0.
            let key = (ctx.loop_frame() as i32)
                .wrapping_mul(4)
                .wrapping_add(data.seed.wrapping_mul(65_537));
            let row_bytes = input.width as usize * RGBA_CHANNELS;
            for (y, row) in out.chunks_exact_mut(row_bytes).enumerate() {
                for (x, px) in row.chunks_exact_mut(RGBA_CHANNELS).enumerate() {
                    let (xi, yi) = (x as i32, y as i32);
                    let mono = hash3_signed(xi, yi, key);
                    for c in 0..3 {
                        let n = if data.monochrome {
                            mono
                        } else {
                            hash3_signed(xi, yi, key.wrapping_add(c as i32 + 1))
                        };
                        px[c] = to_u8(f64::from(px[c]) + n * data.amplitude);
                    }
                }
            }
        }
        Ok(out.into_frame())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fx/grain.rs"]
mod tests;
