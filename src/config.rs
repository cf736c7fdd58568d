//! Tuning constants of the particle field.

use crate::error::{Error, Result};
use crate::particle::Rgba;

/// Viewport area (px²) per particle.
pub const DEFAULT_DENSITY: f32 = 18_000.0;
pub const DEFAULT_MIN_SIZE: f32 = 1.0;
pub const DEFAULT_MAX_SIZE: f32 = 3.0;
/// Largest per-axis displacement per tick.
pub const DEFAULT_MAX_SPEED: f32 = 0.2;
/// Indigo, used for both disks and links.
pub const DEFAULT_COLOR: Rgba = Rgba::rgb(99.0 / 255.0, 102.0 / 255.0, 241.0 / 255.0);

pub const DEFAULT_LINK_DIVISOR: f32 = 7.0;
pub const DEFAULT_LINK_FADE: f32 = 20_000.0;
pub const DEFAULT_LINK_OPACITY: f32 = 0.15;
pub const DEFAULT_LINK_WIDTH: f32 = 1.0;

/// Proximity linker settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkParams {
    /// Pairs closer than `(w / divisor) * (h / divisor)` (squared) get linked.
    pub divisor: f32,
    /// Squared distance at which the opacity factor reaches zero.
    pub fade: f32,
    pub max_opacity: f32,
    pub width: f32,
    pub color: Rgba,
    /// Also visit `(a, a)`; draws a zero-length line per particle.
    pub self_pairs: bool,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            divisor: DEFAULT_LINK_DIVISOR,
            fade: DEFAULT_LINK_FADE,
            max_opacity: DEFAULT_LINK_OPACITY,
            width: DEFAULT_LINK_WIDTH,
            color: DEFAULT_COLOR,
            self_pairs: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    pub density: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub max_speed: f32,
    pub color: Rgba,
    pub link: LinkParams,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            max_speed: DEFAULT_MAX_SPEED,
            color: DEFAULT_COLOR,
            link: LinkParams::default(),
        }
    }
}

impl FieldConfig {
    /// Use one color for disks and links.
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self.link.color = color;
        self
    }

    pub fn validate(&self) -> Result<()> {
        positive("density", self.density)?;
        positive("min_size", self.min_size)?;
        positive("max_size", self.max_size)?;
        if self.min_size > self.max_size {
            return Err(Error::InvalidConfig(format!(
                "min_size ({}) must not exceed max_size ({})",
                self.min_size, self.max_size
            )));
        }
        if !self.max_speed.is_finite() || self.max_speed < 0.0 {
            return Err(Error::InvalidConfig(
                "max_speed must be finite and >= 0".into(),
            ));
        }
        positive("link divisor", self.link.divisor)?;
        positive("link fade", self.link.fade)?;
        positive("link width", self.link.width)?;
        if !self.link.max_opacity.is_finite() || !(0.0..=1.0).contains(&self.link.max_opacity) {
            return Err(Error::InvalidConfig(
                "link opacity must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "{name} must be finite and > 0"
        )));
    }
    Ok(())
}
