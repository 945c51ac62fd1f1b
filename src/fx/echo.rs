use kurbo::{Affine, Point, Vec2};
use smallvec::SmallVec;

use crate::{
    config::{
        color::parse_color_or_white,
        params::{EffectConfig, ParamSpec},
    },
    effects::blend::{BlendMode, HueRotation, TintLut, Vignette, apply_vignette, normal},
    eval::{context::FrameContext, phase::LoopCycles},
    foundation::{
        core::{Frame, RGBA_CHANNELS, Rgb8},
        error::LoopFxResult,
        math::{TAU, to_u8, unit_vec},
    },
    fx::{
        effect::{Effect, EffectMetadata, PRESERVE_ALPHA, StaticSettings},
        geometry::Geometry,
    },
    render::{
        buffer_pool::{BufferPool, BufferShape},
        sample::{EdgeMode, SampleMode, resolve, sample},
    },
};

const PARAMS: &[ParamSpec] = &[
    ParamSpec::int("echo_count", 1, 16, 4, "Number of trailing echoes"),
    ParamSpec::float("decay", 0.0, 1.0, 0.6, "Opacity ratio between successive echoes"),
    ParamSpec::float("spacing", 0.0, 1.0, 0.08, "Loop-time lag between echoes"),
    ParamSpec::float("pulse_intensity", 0.0, 1.0, 0.25, "Opacity swing over each echo's phase"),
    ParamSpec::float(
        "feedback_strength",
        0.0,
        1.0,
        0.3,
        "Previous accumulation fed into each echo",
    ),
    ParamSpec::float("displacement", 0.0, 200.0, 12.0, "Echo travel in pixels"),
    ParamSpec::float("displacement_angle", -360.0, 360.0, 0.0, "Travel direction in degrees"),
    ParamSpec::float("rotation", -180.0, 180.0, 3.0, "Echo swing about the centre in degrees"),
    ParamSpec::float("chroma_offset", 0.0, 50.0, 2.0, "Red/blue split across the travel in pixels"),
    ParamSpec::float("cycles", -16.0, 16.0, 1.0, "Swings per loop"),
    ParamSpec::choice("blend_mode", BlendMode::NAMES, "normal", "How echoes combine"),
    ParamSpec::color("tint_color", "#FFFFFF", "Tint applied after accumulation"),
    ParamSpec::float("tint_strength", 0.0, 1.0, 0.0, "Tint amount"),
    ParamSpec::float("hue_shift", -180.0, 180.0, 0.0, "Hue rotation in degrees"),
    ParamSpec::float("vignette_strength", 0.0, 1.0, 0.0, "Closing vignette"),
    ParamSpec::float("vignette_roundness", 0.0, 1.0, 1.0, "Closing vignette roundness"),
    PRESERVE_ALPHA,
];

static METADATA: EffectMetadata = EffectMetadata {
    id: "echo",
    name: "Echo feedback",
    description: "Time-lagged displaced copies accumulated through a feedback buffer",
    params: PARAMS,
};

/// Time-lagged echoes with feedback accumulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Echo;

/// Resolved echo parameters and lookup tables.
#[derive(Clone, Debug, PartialEq)]
pub struct EchoData {
    /// `decay^i` for every echo.
    weights: SmallVec<[f64; 16]>,
    spacing: f64,
    pulse_intensity: f64,
    feedback_strength: f64,
    travel: Vec2,
    rotation: f64,
    chroma: Vec2,
    cycles: LoopCycles,
    blend: BlendMode,
    tint: TintLut,
    hue: HueRotation,
    vignette: Vignette,
    preserve_alpha: bool,
    geometry: Option<Geometry>,
}

impl Effect for Echo {
    type Data = EchoData;

    fn metadata(&self) -> &'static EffectMetadata {
        &METADATA
    }

    fn precompute(&self, config: &EffectConfig, settings: &StaticSettings) -> EchoData {
        let count = config.i64("echo_count").clamp(1, 16) as i32;
        let decay = config.f64("decay");
        let dir = unit_vec(config.f64("displacement_angle").to_radians());
        EchoData {
            weights: (0..count).map(|i| decay.powi(i)).collect(),
            spacing: config.f64("spacing"),
            pulse_intensity: config.f64("pulse_intensity"),
            feedback_strength: config.f64("feedback_strength"),
            travel: dir * config.f64("displacement"),
            rotation: config.f64("rotation").to_radians(),
            chroma: dir.turn_90() * config.f64("chroma_offset"),
            cycles: LoopCycles::resolve(config.f64("cycles")),
            blend: BlendMode::parse(config.text("blend_mode")),
            tint: TintLut::new(
                parse_color_or_white(config.text("tint_color")),
                config.f64("tint_strength"),
            ),
            hue: HueRotation::new(config.f64("hue_shift")),
            vignette: Vignette {
                strength: config.f64("vignette_strength"),
                roundness: config.f64("vignette_roundness"),
                color: Rgb8::BLACK,
            },
            preserve_alpha: config.flag("preserve_alpha"),
            geometry: Geometry::from_settings(settings),
        }
    }

    fn invoke(
        &self,
        data: &EchoData,
        input: &Frame,
        ctx: FrameContext,
        pool: &BufferPool,
    ) -> LoopFxResult<Frame> {
        input.check()?;
        let (w, h) = (input.width, input.height);
        let geom = Geometry::for_frame(data.geometry, w, h);
        let shape = BufferShape::rgba(w, h);
        let blend = data.blend.func();
        let t = ctx.t();
        let n = data.cycles.get() as f64;

        let mut out = pool.acquire_shape(shape);
        out.copy_from_slice(&input.data);
        let mut feedback = pool.acquire_zeroed(shape);
        let mut echo = pool.acquire_shape(shape);

        for (i, weight) in data.weights.iter().enumerate() {
            let phase = (t - i as f64 * data.spacing).rem_euclid(1.0);
            let pulse = 1.0 + (phase * TAU).sin() * data.pulse_intensity;
            let opacity = (weight * pulse).clamp(0.0, 1.0);
            if opacity == 0.0 {
                continue;
            }
            let swing = (TAU * n * phase).sin();
            let pose = EchoPose {
                center: geom.center,
                offset: data.travel * swing,
                angle: data.rotation * swing,
                chroma: data.chroma,
            };
            render_echo(input, &mut echo, &pose);

            let fs = data.feedback_strength;
            for ((o, e), f) in out
                .chunks_exact_mut(RGBA_CHANNELS)
                .zip(echo.chunks_exact(RGBA_CHANNELS))
                .zip(feedback.chunks_exact(RGBA_CHANNELS))
            {
                for c in 0..3 {
                    let src = (f64::from(e[c]) + f64::from(f[c]) * fs).min(255.0);
                    o[c] = to_u8(blend(f64::from(o[c]), src, opacity));
                }
                if !data.preserve_alpha {
                    o[3] = to_u8(normal(f64::from(o[3]), f64::from(e[3]), opacity));
                }
            }
            feedback.copy_from_slice(&out);
        }
        drop(echo);
        drop(feedback);

        if !data.hue.is_identity() {
            for px in out.chunks_exact_mut(RGBA_CHANNELS) {
                data.hue.apply(px);
            }
        }
        data.tint.apply_rgba(&mut out);
        apply_vignette(&mut out, w, h, &data.vignette, 1.0, !data.preserve_alpha);
        Ok(out.into_frame())
    }
}

/// Placement of one echo copy.
struct EchoPose {
    center: Point,
    offset: Vec2,
    angle: f64,
    chroma: Vec2,
}

/// Source rotated by `angle` about `center` and moved by `offset`; red and blue are read
/// `±chroma` away from green.
fn render_echo(src: &Frame, dst: &mut [u8], pose: &EchoPose) {
    let (w, h) = (src.width, src.height);
    if w == 0 {
        return;
    }
    let view = src.view();
    // Maps an output position back to the source position it shows.
    let inverse = Affine::translate(pose.center.to_vec2())
        * Affine::rotate(-pose.angle)
        * Affine::translate(-pose.center.to_vec2() - pose.offset);
    let taps = [pose.chroma, Vec2::ZERO, -pose.chroma, Vec2::ZERO];

    for (y, row) in dst.chunks_exact_mut(w as usize * RGBA_CHANNELS).enumerate() {
        for (x, px) in row.chunks_exact_mut(RGBA_CHANNELS).enumerate() {
            let q = inverse * Point::new(x as f64, y as f64);
            for (c, tap) in taps.iter().enumerate() {
                let (sx, sy) = resolve(q.x + tap.x, q.y + tap.y, w, h, EdgeMode::Clamp);
                px[c] = to_u8(sample(view, sx, sy, c, SampleMode::Bilinear));
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fx/echo.rs"]
mod tests;
