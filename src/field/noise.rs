use crate::field::hash::hash3;
use crate::foundation::math::lerp;

/// Quintic fade `t³(t(6t − 15) + 10)`.
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// 3-D lattice value noise in `[0, 1]`: hashed corner values, quintic fade, trilinear mix.
///
/// `seed` offsets the lattice along a fourth axis folded into the hash.
pub fn lattice_noise3(x: f64, y: f64, z: f64, seed: i32) -> f64 {
    let (xi, xf) = split(x);
    let (yi, yf) = split(y);
    let (zi, zf) = split(z);
    let u = fade(xf);
    let v = fade(yf);
    let w = fade(zf);

    let zs = zi.wrapping_add(seed.wrapping_mul(7_919));
    let zs1 = zs.wrapping_add(1);
    let c = |dx: i32, dy: i32, z: i32| hash3(xi.wrapping_add(dx), yi.wrapping_add(dy), z);

    let x00 = lerp(c(0, 0, zs), c(1, 0, zs), u);
    let x10 = lerp(c(0, 1, zs), c(1, 1, zs), u);
    let x01 = lerp(c(0, 0, zs1), c(1, 0, zs1), u);
    let x11 = lerp(c(0, 1, zs1), c(1, 1, zs1), u);

    let y0 = lerp(x00, x10, v);
    let y1 = lerp(x01, x11, v);
    lerp(y0, y1, w)
}

/// Sum of `octaves` noise layers with doubling frequency and halving amplitude, in `[0, 1]`.
pub fn fractal_noise3(x: f64, y: f64, z: f64, seed: i32, octaves: u32) -> f64 {
    let octaves = octaves.clamp(1, 8);
    let mut sum = 0.0;
    let mut amp = 1.0;
    let mut freq = 1.0;
    let mut norm = 0.0;
    for o in 0..octaves {
        sum += amp * lattice_noise3(x * freq, y * freq, z * freq, seed.wrapping_add(o as i32));
        norm += amp;
        amp *= 0.5;
        freq *= 2.0;
    }
    sum / norm
}

#[inline]
fn split(v: f64) -> (i32, f64) {
    let f = v.floor();
    // Far-out coordinates wrap the lattice rather than saturating.
    ((f as i64) as i32, v - f)
}

#[cfg(test)]
#[path = "../../tests/unit/field/noise.rs"]
mod tests;
