use kurbo::{Point, Vec2};

use crate::{
    config::{
        color::parse_color_or_white,
        params::{EffectConfig, ParamSpec},
    },
    effects::blend::{BlendFn, BlendMode, normal},
    eval::{
        context::FrameContext,
        phase::{LoopCycles, PhaseSet},
    },
    field::{
        grating::{GratingPhases, Gratings, grating_response},
        hash::hash3,
    },
    foundation::{
        core::{Frame, RGBA_CHANNELS, Rgb8},
        error::LoopFxResult,
        math::to_u8,
    },
    fx::{
        effect::{Effect, EffectMetadata, PRESERVE_ALPHA, StaticSettings, passthrough},
        geometry::Geometry,
    },
    render::{
        buffer_pool::BufferPool,
        sample::{EdgeMode, SampleMode, sample_rgba},
    },
};

const PARAMS: &[ParamSpec] = &[
    ParamSpec::int("orders", 1, 12, 4, "Number of superposed gratings"),
    ParamSpec::float("scale", 0.1, 200.0, 24.0, "Fringes across the longer side"),
    ParamSpec::float("rotation_cycles", -16.0, 16.0, 1.0, "Grating turns per loop"),
    ParamSpec::float("shimmer_cycles", -16.0, 16.0, 2.0, "Fringe shifts per loop"),
    ParamSpec::float("ripple_cycles", -16.0, 16.0, 1.0, "Radial ripple swings per loop"),
    ParamSpec::float("ripple_amplitude", 0.0, 50.0, 4.0, "Radial ripple depth in radians"),
    ParamSpec::float("jitter", 0.0, 90.0, 8.0, "Seeded grating angle jitter in degrees"),
    ParamSpec::int("seed", 0, 2_147_483_647, 1, "Jitter seed"),
    ParamSpec::color("color", "#80C0FF", "Fringe color"),
    ParamSpec::choice(
        "blend_mode",
        BlendMode::NAMES,
        "screen",
        "How fringes combine with the image",
    ),
    ParamSpec::float("strength", 0.0, 1.0, 0.5, "Fringe opacity"),
    ParamSpec::float("warp", 0.0, 50.0, 0.0, "Fringe-driven displacement in pixels"),
    PRESERVE_ALPHA,
];

static METADATA: EffectMetadata = EffectMetadata {
    id: "interference",
    name: "Interference",
    description: "Rotating moire of superposed cosine gratings, blended and optionally warping",
    params: PARAMS,
};

/// Superposed rotating gratings.
#[derive(Clone, Copy, Debug, Default)]
pub struct Interference;

/// Resolved interference parameters with jittered grating vectors.
#[derive(Clone, Debug, PartialEq)]
pub struct InterferenceData {
    gratings: Gratings,
    scale: f64,
    ripple_amplitude: f64,
    /// Rotation, shimmer, ripple.
    cycles: [LoopCycles; 3],
    color: [f64; 3],
    blend: BlendMode,
    strength: f64,
    warp: f64,
    preserve_alpha: bool,
    geometry: Option<Geometry>,
}

fn gratings(orders: i64, jitter_deg: f64, seed: i32) -> Gratings {
    let n = orders.max(1) as i32;
    let jitter = jitter_deg.to_radians();
    (0..n)
        .map(|k| {
            let base = std::f64::consts::PI * f64::from(k) / f64::from(n);
            let j = jitter * (2.0 * hash3(seed, k, 17) - 1.0);
            Vec2::from_angle(base + j)
        })
        .collect()
}

impl Effect for Interference {
    type Data = InterferenceData;

    fn metadata(&self) -> &'static EffectMetadata {
        &METADATA
    }

    fn precompute(&self, config: &EffectConfig, settings: &StaticSettings) -> InterferenceData {
        let seed = config.i64("seed").clamp(0, i64::from(i32::MAX)) as i32;
        let color: Rgb8 = parse_color_or_white(config.text("color"));
        InterferenceData {
            gratings: gratings(config.i64("orders"), config.f64("jitter"), seed),
            scale: config.f64("scale"),
            ripple_amplitude: config.f64("ripple_amplitude"),
            cycles: ["rotation_cycles", "shimmer_cycles", "ripple_cycles"]
                .map(|k| LoopCycles::resolve(config.f64(k))),
            color: color.channels_f64(),
            blend: BlendMode::parse(config.text("blend_mode")),
            strength: config.f64("strength"),
            warp: config.f64("warp"),
            preserve_alpha: config.flag("preserve_alpha"),
            geometry: Geometry::from_settings(settings),
        }
    }

    fn invoke(
        &self,
        data: &InterferenceData,
        input: &Frame,
        ctx: FrameContext,
        pool: &BufferPool,
    ) -> LoopFxResult<Frame> {
        input.check()?;
        if data.strength == 0.0 && data.warp == 0.0 {
            return Ok(passthrough(input, pool));
        }
        let geom = Geometry::for_frame(data.geometry, input.width, input.height);
        let phases = PhaseSet::resolve(&data.cycles, ctx);
        let phases = GratingPhases {
            rotation: phases.get(0),
            shimmer: phases.get(1),
            ripple: phases.get(2),
        };
        let warp_dir = Vec2::from_angle(phases.rotation) * data.warp;
        let blend: BlendFn = data.blend.func();

        let view = input.view();
        let mut out = pool.acquire(input.width, input.height, RGBA_CHANNELS);
        let row_bytes = input.width as usize * RGBA_CHANNELS;
        for (y, row) in out.chunks_exact_mut(row_bytes.max(1)).enumerate() {
            for (x, px) in row.chunks_exact_mut(RGBA_CHANNELS).enumerate() {
                let p = Point::new(x as f64, y as f64);
                let u = (p.x - geom.center.x) / geom.max_dim;
                let v = (p.y - geom.center.y) / geom.max_dim;
                let response = grating_response(
                    u,
                    v,
                    &data.gratings,
                    data.scale,
                    data.ripple_amplitude,
                    phases,
                );

                let src = if data.warp > 0.0 {
                    let q = p + warp_dir * response;
                    sample_rgba(view, q.x, q.y, EdgeMode::Clamp, SampleMode::Bilinear)
                } else {
                    let i = (y * input.width as usize + x) * RGBA_CHANNELS;
                    let s = &input.data[i..i + RGBA_CHANNELS];
                    [s[0], s[1], s[2], s[3]].map(f64::from)
                };

                let alpha = data.strength * (response + 1.0) * 0.5;
                for c in 0..3 {
                    px[c] = to_u8(blend(src[c], data.color[c], alpha));
                }
                px[3] = if data.preserve_alpha {
                    view.at(x as u32, y as u32, 3)
                } else {
                    to_u8(normal(src[3], 255.0, alpha))
                };
            }
        }
        Ok(out.into_frame())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fx/interference.rs"]
mod tests;
