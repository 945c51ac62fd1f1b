use kurbo::{Point, Vec2};

use crate::foundation::math::TAU;

/// Geometry of a polar ripple.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleField {
    /// Ripple origin in pixels.
    pub center: Point,
    /// Radius normalizer (half the frame diagonal).
    pub half_diag: f64,
    /// Angular lobes per turn; integral so the field is continuous across θ = ±π.
    pub frequency: f64,
    /// Rings from the centre to the normalizing radius.
    pub radial_cycles: f64,
    /// Peak displacement in pixels.
    pub amplitude: f64,
}

/// Radial displacement `sin(θ·frequency + r·radialCycles·2π + phase)·amplitude`.
///
/// Zero at the exact centre, where the radial direction is undefined.
pub fn polar_ripple(p: Point, field: &RippleField, phase: f64) -> Vec2 {
    let d = p - field.center;
    let dist = d.hypot();
    if dist <= f64::EPSILON || field.amplitude == 0.0 {
        return Vec2::ZERO;
    }
    let theta = d.y.atan2(d.x);
    let r = dist / field.half_diag.max(f64::EPSILON);
    let mag = (theta * field.frequency + r * field.radial_cycles * TAU + phase).sin()
        * field.amplitude;
    d * (mag / dist)
}

/// Per-channel sampling offsets orbiting the pixel's angle around `center`.
///
/// Channel `c` is offset by `radius` along `atan2(dy, dx) + channel_phases[c] + rotation`.
pub fn chromatic_orbit(
    p: Point,
    center: Point,
    rotation: f64,
    channel_phases: &[f64; 3],
    radius: f64,
) -> [Vec2; 3] {
    if radius == 0.0 {
        return [Vec2::ZERO; 3];
    }
    let d = p - center;
    let base = d.y.atan2(d.x) + rotation;
    channel_phases.map(|cp| Vec2::from_angle(base + cp) * radius)
}

/// One point vortex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vortex {
    /// Centre in pixels.
    pub center: Point,
    /// Peak tangential displacement in pixels; the sign sets the spin direction.
    pub strength: f64,
}

/// Superposed tangential displacement of `vortices` at `p`.
///
/// Each contributes `strength·(1 − d/max_radius)` for `d < max_radius` along the radius vector
/// rotated by 90°.
pub fn vortex_flow(p: Point, vortices: &[Vortex], max_radius: f64) -> Vec2 {
    if max_radius <= 0.0 {
        return Vec2::ZERO;
    }
    let mut acc = Vec2::ZERO;
    for v in vortices {
        let d = p - v.center;
        let dist = d.hypot();
        if dist >= max_radius || dist <= f64::EPSILON {
            continue;
        }
        let influence = v.strength * (1.0 - dist / max_radius);
        acc += d.turn_90() * (influence / dist);
    }
    acc
}

#[cfg(test)]
#[path = "../../tests/unit/field/flow.rs"]
mod tests;
