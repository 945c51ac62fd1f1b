use kurbo::{Point, Vec2};

use crate::{
    config::params::{EffectConfig, ParamSpec},
    foundation::{
        core::{Frame, RGBA_CHANNELS},
        error::{LoopFxError, LoopFxResult},
        math::to_u8,
    },
    render::sample::{EdgeMode, SampleMode, resolve, sample, sample_rgba},
};

pub(crate) const EDGE: ParamSpec = ParamSpec::choice(
    "edge",
    &["clamp", "wrap"],
    "clamp",
    "Out-of-range sample policy",
);

pub(crate) const SAMPLING: ParamSpec = ParamSpec::choice(
    "sampling",
    &["bilinear", "nearest"],
    "bilinear",
    "Sample interpolation",
);

/// Edge policy and interpolation of a displacement effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Sampling {
    pub edge: EdgeMode,
    pub mode: SampleMode,
}

impl Sampling {
    /// Read the `edge` and `sampling` choices.
    pub fn from_config(config: &EffectConfig) -> Self {
        Self {
            edge: EdgeMode::parse(config.text("edge")),
            mode: SampleMode::parse(config.text("sampling")),
        }
    }
}

fn check_dst(src: &Frame, dst: &[u8]) -> LoopFxResult<()> {
    if dst.len() != src.data.len() {
        return Err(LoopFxError::validation(format!(
            "displacement target has {} bytes, source has {}",
            dst.len(),
            src.data.len()
        )));
    }
    Ok(())
}

/// `dst(p) = src(p + field(p))` over every pixel of `src`.
///
/// With `preserve_alpha` the alpha of `dst(p)` is copied from `src(p)`; otherwise it is sampled
/// at the displaced position like the color channels.
pub(crate) fn displace(
    src: &Frame,
    dst: &mut [u8],
    sampling: Sampling,
    preserve_alpha: bool,
    field: impl Fn(Point) -> Vec2,
) -> LoopFxResult<()> {
    check_dst(src, dst)?;
    if src.width == 0 {
        return Ok(());
    }
    let view = src.view();
    let row_bytes = src.width as usize * RGBA_CHANNELS;
    for (y, row) in dst.chunks_exact_mut(row_bytes).enumerate() {
        for (x, px) in row.chunks_exact_mut(RGBA_CHANNELS).enumerate() {
            let p = Point::new(x as f64, y as f64);
            let q = p + field(p);
            let s = sample_rgba(view, q.x, q.y, sampling.edge, sampling.mode);
            for c in 0..3 {
                px[c] = to_u8(s[c]);
            }
            px[3] = if preserve_alpha {
                view.at(x as u32, y as u32, 3)
            } else {
                to_u8(s[3])
            };
        }
    }
    Ok(())
}

/// Like [`displace`] with one offset per color channel (R, G, B).
///
/// Without `preserve_alpha`, alpha follows the green offset.
pub(crate) fn displace_channels(
    src: &Frame,
    dst: &mut [u8],
    sampling: Sampling,
    preserve_alpha: bool,
    field: impl Fn(Point) -> [Vec2; 3],
) -> LoopFxResult<()> {
    check_dst(src, dst)?;
    if src.width == 0 {
        return Ok(());
    }
    let view = src.view();
    let (w, h) = (src.width, src.height);
    let row_bytes = w as usize * RGBA_CHANNELS;
    for (y, row) in dst.chunks_exact_mut(row_bytes).enumerate() {
        for (x, px) in row.chunks_exact_mut(RGBA_CHANNELS).enumerate() {
            let p = Point::new(x as f64, y as f64);
            let offsets = field(p);
            for (c, off) in offsets.iter().enumerate() {
                let (sx, sy) = resolve(p.x + off.x, p.y + off.y, w, h, sampling.edge);
                px[c] = to_u8(sample(view, sx, sy, c, sampling.mode));
            }
            px[3] = if preserve_alpha {
                view.at(x as u32, y as u32, 3)
            } else {
                let (sx, sy) = resolve(p.x + offsets[1].x, p.y + offsets[1].y, w, h, sampling.edge);
                to_u8(sample(view, sx, sy, 3, sampling.mode))
            };
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/fx/warp.rs"]
mod tests;
