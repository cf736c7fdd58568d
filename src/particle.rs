use std::str::FromStr;

use glam::Vec2;

use crate::error::Error;
use crate::surface::DrawSurface;

/// Straight-alpha color, laid out so it can be copied into a GPU buffer as is.
#[repr(C)]
#[derive(bytemuck::Pod, bytemuck::Zeroable, Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl FromStr for Rgba {
    type Err = Error;

    /// Parses `#rrggbb` or `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }

        let mut channels = [1.0f32; 4];
        for (i, channel) in channels.iter_mut().enumerate().take(hex.len() / 2) {
            let byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
            *channel = byte as f32 / 255.0;
        }

        let [r, g, b, a] = channels;
        Ok(Self { r, g, b, a })
    }
}

/// A single point of the field, drawn as a filled disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Per-tick displacement.
    pub direction: Vec2,
    /// Disk radius, fixed at creation.
    pub size: f32,
    pub color: Rgba,
}

impl Particle {
    pub fn new(position: Vec2, direction: Vec2, size: f32, color: Rgba) -> Self {
        Self {
            position,
            direction,
            size,
            color,
        }
    }

    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        surface.fill_disk(self.position, self.size, self.color);
    }
}
