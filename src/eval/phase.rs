use smallvec::SmallVec;

use crate::eval::context::FrameContext;
use crate::foundation::math::TAU;

/// A whole number of cycles per loop, resolved from a nominal (possibly fractional) rate.
///
/// Integer cycles are what make a loop perfect: the phase at frame `total` is the phase at
/// frame 0, and every step advances by the same angle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LoopCycles(i64);

impl LoopCycles {
    /// Wrap an already-integral cycle count.
    pub const fn exact(n: i64) -> Self {
        Self(n)
    }

    /// Resolve a nominal rate to the nearest admissible integer.
    ///
    /// The magnitude is resolved over the candidate window `[max(0, ⌊m⌋-1), ⌊m⌋+2]`, ascending,
    /// with zero excluded whenever the nominal value is nonzero; the closest candidate wins and
    /// ties go to the smaller count. The sign of `nominal` is kept.
    pub fn resolve(nominal: f64) -> Self {
        if !nominal.is_finite() {
            return Self(0);
        }
        let mag = nominal.abs();
        // Clamp keeps the i64 conversion meaningful for absurd inputs.
        let base = mag.floor().min(1.0e15) as i64;
        let lo = (base - 1).max(0);
        let hi = base + 2;

        let mut best: Option<(i64, f64)> = None;
        for n in lo..=hi {
            if n == 0 && mag > 0.0 {
                continue;
            }
            let d = (n as f64 - mag).abs();
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((n, d)),
            }
        }
        let n = best.map(|(n, _)| n).unwrap_or(0);
        Self(if nominal < 0.0 { -n } else { n })
    }

    /// Signed cycle count.
    pub fn get(self) -> i64 {
        self.0
    }

    /// Phase in `[0, 2π)` at `ctx`.
    ///
    /// The frame product is reduced in integer arithmetic before the single float division, so
    /// phases of equal residues are bit-identical.
    pub fn phase(self, ctx: FrameContext) -> f64 {
        let total = i128::from(ctx.total);
        let k = (i128::from(self.0) * i128::from(ctx.loop_frame())).rem_euclid(total);
        TAU * (k as f64) / (ctx.total as f64)
    }

    /// Phase advance per frame for a loop of `total` frames, in `[0, 2π)`.
    pub fn step(self, total: u64) -> f64 {
        let total = total.max(1);
        let k = i128::from(self.0).rem_euclid(i128::from(total));
        TAU * (k as f64) / (total as f64)
    }
}

/// Phases of several independently resolved rates for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhaseSet(SmallVec<[f64; 4]>);

impl PhaseSet {
    /// Resolve every rate in `cycles` at `ctx`, preserving order.
    pub fn resolve(cycles: &[LoopCycles], ctx: FrameContext) -> Self {
        Self(cycles.iter().map(|c| c.phase(ctx)).collect())
    }

    /// Phase `i`, or 0 if absent.
    pub fn get(&self, i: usize) -> f64 {
        self.0.get(i).copied().unwrap_or(0.0)
    }

    /// Number of phases.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when no phases were resolved.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Phase advance from `from` to `to`, folded into `[0, 2π)`.
pub fn phase_delta(from: f64, to: f64) -> f64 {
    (to - from).rem_euclid(TAU)
}

#[cfg(test)]
#[path = "../../tests/unit/eval/phase.rs"]
mod tests;
