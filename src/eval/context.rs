/// Position of one frame inside a loop of `total` frames.
///
/// `total` is always at least 1 and `frame` is reduced modulo `total` for every time-derived
/// quantity, so frame `total` is the same instant as frame 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameContext {
    /// Absolute 0-based frame index.
    pub frame: u64,
    /// Frames per loop.
    pub total: u64,
}

impl FrameContext {
    /// Create a context; a `total` of zero is coerced to one.
    pub fn new(frame: u64, total: u64) -> Self {
        Self {
            frame,
            total: total.max(1),
        }
    }

    /// Frame index folded into `[0, total)`.
    pub fn loop_frame(self) -> u64 {
        self.frame % self.total
    }

    /// Normalized loop time in `[0, 1)`.
    pub fn t(self) -> f64 {
        self.loop_frame() as f64 / self.total as f64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/context.rs"]
mod tests;
