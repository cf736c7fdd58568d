/// Extents of the drawing surface in pixels.
///
/// Negative extents are treated as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Squared distance below which two particles get linked: `(w / d) * (h / d)`.
    pub fn link_threshold(&self, divisor: f32) -> f32 {
        (self.width / divisor) * (self.height / divisor)
    }
}

impl From<(u32, u32)> for Viewport {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width as f32, height as f32)
    }
}
