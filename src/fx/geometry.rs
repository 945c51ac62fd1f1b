use kurbo::Point;

use crate::fx::effect::StaticSettings;

/// Frame-size-derived constants shared by the field effects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Geometry {
    pub width: u32,
    pub height: u32,
    /// Centre of the pixel lattice.
    pub center: Point,
    pub half_diag: f64,
    pub min_dim: f64,
    pub max_dim: f64,
}

impl Geometry {
    pub fn new(width: u32, height: u32) -> Self {
        let w = f64::from(width);
        let h = f64::from(height);
        Self {
            width,
            height,
            center: Point::new((w - 1.0).max(0.0) * 0.5, (h - 1.0).max(0.0) * 0.5),
            half_diag: (0.5 * w.hypot(h)).max(f64::EPSILON),
            min_dim: w.min(h).max(1.0),
            max_dim: w.max(h).max(1.0),
        }
    }

    /// Precomputed geometry, when the settings carry both dimensions.
    pub fn from_settings(settings: &StaticSettings) -> Option<Self> {
        settings.size().map(|(w, h)| Self::new(w, h))
    }

    /// Geometry for a raster of `width × height`: the precomputed one when it matches,
    /// otherwise derived on the spot.
    pub fn for_frame(pre: Option<Self>, width: u32, height: u32) -> Self {
        match pre {
            Some(g) if g.width == width && g.height == height => g,
            Some(g) => {
                tracing::debug!(
                    prepared_width = g.width,
                    prepared_height = g.height,
                    width,
                    height,
                    "frame size differs from prepared settings"
                );
                Self::new(width, height)
            }
            None => Self::new(width, height),
        }
    }

    /// A point at fractional position `(fx, fy)` of the pixel lattice.
    pub fn at_fraction(&self, fx: f64, fy: f64) -> Point {
        Point::new(
            fx * f64::from(self.width.saturating_sub(1)),
            fy * f64::from(self.height.saturating_sub(1)),
        )
    }
}
