use crate::foundation::error::{LoopFxError, LoopFxResult};

/// Rec. 709 luma of 8-bit RGB, in `[0, 1]`.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    (0.2126 * f64::from(r) + 0.7152 * f64::from(g) + 0.0722 * f64::from(b)) / 255.0
}

/// Copy the RGB of pixels brighter than `threshold` from RGBA `src` into RGB `dst`; zero the
/// rest. Returns the number of pixels that passed.
pub fn bright_pass(src: &[u8], dst: &mut [u8], threshold: f64) -> LoopFxResult<usize> {
    if src.len() / 4 != dst.len() / 3
        || !src.len().is_multiple_of(4)
        || !dst.len().is_multiple_of(3)
    {
        return Err(LoopFxError::evaluation(
            "bright_pass expects rgba src and rgb dst of equal pixel count",
        ));
    }
    let mut lit = 0usize;
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(3)) {
        if luma(s[0], s[1], s[2]) > threshold {
            d.copy_from_slice(&s[..3]);
            lit += 1;
        } else {
            d.fill(0);
        }
    }
    Ok(lit)
}

/// Separable box blur of an interleaved buffer: horizontal pass into `tmp`, vertical pass
/// into `dst`. Window width is `2·radius + 1`; indices past the edge clamp to the edge.
pub fn box_blur(
    src: &[u8],
    tmp: &mut [u8],
    dst: &mut [u8],
    width: u32,
    height: u32,
    channels: usize,
    radius: u32,
) -> LoopFxResult<()> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| LoopFxError::evaluation("blur buffer size overflow"))?;
    if src.len() != expected_len || tmp.len() != expected_len || dst.len() != expected_len {
        return Err(LoopFxError::evaluation(
            "box_blur expects src, tmp and dst matching width*height*channels",
        ));
    }
    if radius == 0 || expected_len == 0 {
        dst.copy_from_slice(src);
        return Ok(());
    }

    horizontal_pass(src, tmp, width as usize, height as usize, channels, radius as usize);
    vertical_pass(tmp, dst, width as usize, height as usize, channels, radius as usize);
    Ok(())
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], w: usize, h: usize, ch: usize, r: usize) {
    let k = (2 * r + 1) as u32;
    let last = w - 1;
    for y in 0..h {
        let row = y * w;
        for c in 0..ch {
            let at = |x: usize| u32::from(src[(row + x) * ch + c]);
            let mut sum: u32 = (0..=2 * r).map(|i| at(i.saturating_sub(r).min(last))).sum();
            for x in 0..w {
                dst[(row + x) * ch + c] = div_round(sum, k);
                let add = (x + r + 1).min(last);
                let sub = x.saturating_sub(r);
                sum = sum + at(add) - at(sub);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], w: usize, h: usize, ch: usize, r: usize) {
    let k = (2 * r + 1) as u32;
    let last = h - 1;
    for x in 0..w {
        for c in 0..ch {
            let at = |y: usize| u32::from(src[(y * w + x) * ch + c]);
            let mut sum: u32 = (0..=2 * r).map(|i| at(i.saturating_sub(r).min(last))).sum();
            for y in 0..h {
                dst[(y * w + x) * ch + c] = div_round(sum, k);
                let add = (y + r + 1).min(last);
                let sub = y.saturating_sub(r);
                sum = sum + at(add) - at(sub);
            }
        }
    }
}

#[inline]
fn div_round(sum: u32, k: u32) -> u8 {
    ((sum + k / 2) / k).min(255) as u8
}

/// `dst.rgb = min(255, dst.rgb + glow.rgb · gain)` with RGBA `dst` and RGB `glow`.
pub fn add_glow(dst: &mut [u8], glow: &[u8], gain: f64) -> LoopFxResult<()> {
    if dst.len() / 4 != glow.len() / 3 || !dst.len().is_multiple_of(4) {
        return Err(LoopFxError::evaluation(
            "add_glow expects rgba dst and rgb glow of equal pixel count",
        ));
    }
    if gain <= 0.0 {
        return Ok(());
    }
    for (d, g) in dst.chunks_exact_mut(4).zip(glow.chunks_exact(3)) {
        for c in 0..3 {
            let v = f64::from(d[c]) + f64::from(g[c]) * gain;
            d[c] = crate::foundation::math::to_u8(v.min(255.0));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
