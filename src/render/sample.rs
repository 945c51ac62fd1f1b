use crate::foundation::core::RasterView;

/// Interpolation used when reading between pixel centres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SampleMode {
    /// Weighted mix of the four surrounding pixels.
    #[default]
    Bilinear,
    /// Closest pixel.
    Nearest,
}

impl SampleMode {
    /// Parse a mode name; unknown names select [`SampleMode::Bilinear`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" | "point" => Self::Nearest,
            _ => Self::Bilinear,
        }
    }
}

/// How coordinates outside the raster are brought back in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeMode {
    /// Saturate into `[0, size - 1]`.
    #[default]
    Clamp,
    /// Tile: Euclidean modulo the raster size.
    Wrap,
}

impl EdgeMode {
    /// Parse an edge policy name; unknown names select [`EdgeMode::Clamp`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "wrap" | "repeat" | "tile" => Self::Wrap,
            _ => Self::Clamp,
        }
    }
}

/// Apply the edge policy to raw source coordinates.
#[inline]
pub fn resolve(x: f64, y: f64, width: u32, height: u32, edge: EdgeMode) -> (f64, f64) {
    let w = f64::from(width.max(1));
    let h = f64::from(height.max(1));
    match edge {
        EdgeMode::Clamp => (x.clamp(0.0, w - 1.0), y.clamp(0.0, h - 1.0)),
        EdgeMode::Wrap => (x.rem_euclid(w), y.rem_euclid(h)),
    }
}

/// Read one channel at fractional `(x, y)`.
///
/// Coordinates are expected to be resolved already; lattice neighbours are still clamped per
/// axis so any finite input is safe.
#[inline]
pub fn sample(src: RasterView<'_>, x: f64, y: f64, channel: usize, mode: SampleMode) -> f64 {
    if src.width == 0 || src.height == 0 {
        return 0.0;
    }
    let max_x = i64::from(src.width) - 1;
    let max_y = i64::from(src.height) - 1;
    let x = if x.is_finite() { x } else { 0.0 };
    let y = if y.is_finite() { y } else { 0.0 };

    match mode {
        SampleMode::Nearest => {
            let xi = (x.round() as i64).clamp(0, max_x) as u32;
            let yi = (y.round() as i64).clamp(0, max_y) as u32;
            f64::from(src.at(xi, yi, channel))
        }
        SampleMode::Bilinear => {
            let x0f = x.floor();
            let y0f = y.floor();
            let fx = x - x0f;
            let fy = y - y0f;
            let x0 = (x0f as i64).clamp(0, max_x) as u32;
            let x1 = (x0f as i64 + 1).clamp(0, max_x) as u32;
            let y0 = (y0f as i64).clamp(0, max_y) as u32;
            let y1 = (y0f as i64 + 1).clamp(0, max_y) as u32;

            let p00 = f64::from(src.at(x0, y0, channel));
            let p10 = f64::from(src.at(x1, y0, channel));
            let p01 = f64::from(src.at(x0, y1, channel));
            let p11 = f64::from(src.at(x1, y1, channel));

            let top = p00 * (1.0 - fx) + p10 * fx;
            let bottom = p01 * (1.0 - fx) + p11 * fx;
            top * (1.0 - fy) + bottom * fy
        }
    }
}

/// Resolve `(x, y)` under `edge` and read every channel (up to four).
#[inline]
pub fn sample_rgba(
    src: RasterView<'_>,
    x: f64,
    y: f64,
    edge: EdgeMode,
    mode: SampleMode,
) -> [f64; 4] {
    let (x, y) = resolve(x, y, src.width, src.height, edge);
    let mut out = [0.0; 4];
    for (c, o) in out.iter_mut().enumerate().take(src.channels.min(4)) {
        *o = sample(src, x, y, c, mode);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/sample.rs"]
mod tests;
