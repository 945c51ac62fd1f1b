const PRIME_A: u32 = 374_761_393;
const PRIME_B: u32 = 668_265_263;
const PRIME_C: u32 = 2_246_822_519;
const MIX: u32 = 1_274_126_177;

#[inline]
fn mix(a: i32, b: i32, c: i32) -> u32 {
    let n = (a as u32).wrapping_mul(PRIME_A)
        ^ (b as u32).wrapping_mul(PRIME_B)
        ^ (c as u32).wrapping_mul(PRIME_C);
    let n = (n ^ (n >> 13)).wrapping_mul(MIX);
    n ^ (n >> 16)
}

/// Integer lattice hash: `n·(n·n·15731 + 789221) + 1376312589 (mod 2^32)` over mixed inputs.
#[inline]
pub fn hash_u32(a: i32, b: i32, c: i32) -> u32 {
    let n = mix(a, b, c);
    n.wrapping_mul(n.wrapping_mul(n).wrapping_mul(15_731).wrapping_add(789_221))
        .wrapping_add(1_376_312_589)
}

/// [`hash_u32`] scaled into `[0, 1]`.
#[inline]
pub fn hash3(a: i32, b: i32, c: i32) -> f64 {
    f64::from(hash_u32(a, b, c)) / f64::from(u32::MAX)
}

/// Two-input form of [`hash3`].
#[inline]
pub fn hash2(a: i32, b: i32) -> f64 {
    hash3(a, b, 0)
}

/// Signed variant of [`hash3`] in `[-1, 1]`.
#[inline]
pub fn hash3_signed(a: i32, b: i32, c: i32) -> f64 {
    hash3(a, b, c) * 2.0 - 1.0
}

#[cfg(test)]
#[path = "../../tests/unit/field/hash.rs"]
mod tests;
