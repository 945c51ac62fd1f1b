use crate::foundation::core::Rgb8;
use crate::foundation::math::{lerp, to_u8};

/// Per-channel blend `(base, blend, alpha) -> result` over channel values in `0..=255`.
pub type BlendFn = fn(f64, f64, f64) -> f64;

/// Supported blend operators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Linear interpolation.
    #[default]
    Normal,
    /// Inverse-multiply of inverses.
    Screen,
    /// Saturating addition.
    Add,
    /// Multiply in the shadows, screen in the highlights.
    Overlay,
}

impl BlendMode {
    /// Parameter names accepted by [`BlendMode::parse`].
    pub const NAMES: &'static [&'static str] = &["normal", "screen", "add", "overlay"];

    /// Parse a mode name; unknown names select [`BlendMode::Normal`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "screen" => Self::Screen,
            "add" | "additive" | "lighter" => Self::Add,
            "overlay" => Self::Overlay,
            _ => Self::Normal,
        }
    }

    /// The pure channel function for this mode.
    pub fn func(self) -> BlendFn {
        match self {
            Self::Normal => normal,
            Self::Screen => screen,
            Self::Add => add,
            Self::Overlay => overlay,
        }
    }
}

/// `base·(1 − a) + blend·a`.
pub fn normal(base: f64, blend: f64, a: f64) -> f64 {
    base * (1.0 - a) + blend * a
}

/// `base + (255 − (255 − base)(255 − blend)/255 − base)·a`.
pub fn screen(base: f64, blend: f64, a: f64) -> f64 {
    base + (255.0 - (255.0 - base) * (255.0 - blend) / 255.0 - base) * a
}

/// `min(255, base + blend·a)`.
pub fn add(base: f64, blend: f64, a: f64) -> f64 {
    (base + blend * a).min(255.0)
}

/// Overlay, then lerp toward `base` by `1 − a`.
pub fn overlay(base: f64, blend: f64, a: f64) -> f64 {
    let o = if base < 128.0 {
        2.0 * base * blend / 255.0
    } else {
        255.0 - 2.0 * (255.0 - base) * (255.0 - blend) / 255.0
    };
    lerp(base, o, a)
}

/// Precomputed per-channel tint tables: `lerp(v, tint, strength)` for every byte value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TintLut {
    tables: [[u8; 256]; 3],
    identity: bool,
}

impl TintLut {
    /// Build tables for `color` at `strength` in `[0, 1]`.
    pub fn new(color: Rgb8, strength: f64) -> Self {
        let strength = strength.clamp(0.0, 1.0);
        let target = color.channels_f64();
        let mut tables = [[0u8; 256]; 3];
        for (c, table) in tables.iter_mut().enumerate() {
            for (v, slot) in table.iter_mut().enumerate() {
                *slot = to_u8(lerp(v as f64, target[c], strength));
            }
        }
        Self {
            tables,
            identity: strength == 0.0,
        }
    }

    /// `true` when the tables map every value to itself.
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Tint one RGB triple.
    #[inline]
    pub fn apply(&self, px: &mut [u8]) {
        for c in 0..3 {
            px[c] = self.tables[c][px[c] as usize];
        }
    }

    /// Tint an RGBA buffer in place.
    pub fn apply_rgba(&self, buf: &mut [u8]) {
        if self.identity {
            return;
        }
        for px in buf.chunks_exact_mut(4) {
            self.apply(px);
        }
    }
}

/// Luminance-preserving hue rotation matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HueRotation {
    m: [[f64; 3]; 3],
    identity: bool,
}

impl HueRotation {
    /// Rotation by `degrees` around the grey axis.
    pub fn new(degrees: f64) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        let m = [
            [
                0.213 + c * 0.787 - s * 0.213,
                0.715 - c * 0.715 - s * 0.715,
                0.072 - c * 0.072 + s * 0.928,
            ],
            [
                0.213 - c * 0.213 + s * 0.143,
                0.715 + c * 0.285 + s * 0.140,
                0.072 - c * 0.072 - s * 0.283,
            ],
            [
                0.213 - c * 0.213 - s * 0.787,
                0.715 - c * 0.715 + s * 0.715,
                0.072 + c * 0.928 + s * 0.072,
            ],
        ];
        Self {
            m,
            identity: degrees.rem_euclid(360.0) == 0.0,
        }
    }

    /// `true` for a whole number of turns.
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Rotate one RGB triple in place.
    #[inline]
    pub fn apply(&self, px: &mut [u8]) {
        if self.identity {
            return;
        }
        let rgb = [f64::from(px[0]), f64::from(px[1]), f64::from(px[2])];
        for (c, row) in self.m.iter().enumerate() {
            px[c] = to_u8(row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2]);
        }
    }
}

/// Vignette geometry and color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vignette {
    /// Darkening at and beyond the normalized edge, `[0, 1]`.
    pub strength: f64,
    /// 0 = rectangular distance, 1 = circular distance.
    pub roundness: f64,
    /// Color the edges fall toward (black = multiplicative darkening).
    pub color: Rgb8,
}

/// Falloff `1 − strength·min(1, r²)` for normalized offsets `dx`, `dy` in `[-1, 1]`.
#[inline]
pub fn vignette_falloff(dx: f64, dy: f64, strength: f64, roundness: f64) -> f64 {
    let rect = dx.abs().max(dy.abs());
    let circ = dx.hypot(dy);
    let r = lerp(rect, circ, roundness.clamp(0.0, 1.0));
    1.0 - strength * (r * r).min(1.0)
}

/// Apply a vignette to an RGBA buffer in place; `gain` scales the strength.
///
/// Alpha is left alone unless `fade_alpha` is set, in which case it is scaled by the falloff.
pub fn apply_vignette(
    buf: &mut [u8],
    width: u32,
    height: u32,
    vignette: &Vignette,
    gain: f64,
    fade_alpha: bool,
) {
    let strength = (vignette.strength * gain).clamp(0.0, 1.0);
    if strength == 0.0 || width == 0 || height == 0 {
        return;
    }
    let hw = f64::from(width) * 0.5;
    let hh = f64::from(height) * 0.5;
    let col = vignette.color.channels_f64();

    for (y, row) in buf.chunks_exact_mut(width as usize * 4).enumerate() {
        let dy = (y as f64 + 0.5 - hh) / hh;
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let dx = (x as f64 + 0.5 - hw) / hw;
            let v = vignette_falloff(dx, dy, strength, vignette.roundness);
            for c in 0..3 {
                px[c] = to_u8(lerp(col[c], f64::from(px[c]), v));
            }
            if fade_alpha {
                px[3] = to_u8(f64::from(px[3]) * v);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blend.rs"]
mod tests;
