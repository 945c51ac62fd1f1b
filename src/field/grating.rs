use kurbo::Vec2;
use smallvec::SmallVec;

use crate::foundation::math::TAU;

/// Grating directions, one per diffraction order.
pub type Gratings = SmallVec<[Vec2; 8]>;

/// Phases driving one evaluation of [`grating_response`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GratingPhases {
    /// Rotation applied to every grating vector.
    pub rotation: f64,
    /// Global phase offset added to every order.
    pub shimmer: f64,
    /// Phase of the radial ripple term.
    pub ripple: f64,
}

/// Interference of `gratings` at centred, normalized coordinates `(u, v)`, in `[-1, 1]`.
///
/// `mean_k cos(2π·scale·(u·rx_k + v·ry_k) + sin(ripple)·ripple_amp·radius + shimmer)` with each
/// grating rotated by `phases.rotation`.
pub fn grating_response(
    u: f64,
    v: f64,
    gratings: &[Vec2],
    scale: f64,
    ripple_amp: f64,
    phases: GratingPhases,
) -> f64 {
    if gratings.is_empty() {
        return 0.0;
    }
    let (s, c) = phases.rotation.sin_cos();
    let radius = u.hypot(v);
    let offset = phases.ripple.sin() * ripple_amp * radius + phases.shimmer;

    let mut sum = 0.0;
    for g in gratings {
        let rx = g.x * c - g.y * s;
        let ry = g.x * s + g.y * c;
        sum += (TAU * scale * (u * rx + v * ry) + offset).cos();
    }
    sum / gratings.len() as f64
}

#[cfg(test)]
#[path = "../../tests/unit/field/grating.rs"]
mod tests;
