//! The drawing seam between the simulator and whatever rasterises it.

use glam::Vec2;

use crate::particle::Rgba;

/// A 2D surface the field draws on, sized to the viewport.
pub trait DrawSurface {
    /// Erase everything drawn so far.
    fn clear(&mut self);

    fn fill_disk(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Stroke a straight segment. `color.a` may fall slightly outside `[0, 1]`.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Disk {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
}

/// Records draw calls for the current frame.
///
/// The window host uploads it to the GPU, the headless host and the tests
/// inspect it directly.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    clears: u64,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of times the list has been cleared, i.e. frames started.
    pub fn clears(&self) -> u64 {
        self.clears
    }

    pub fn disks(&self) -> impl Iterator<Item = (Vec2, f32, Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Disk {
                center,
                radius,
                color,
            } => Some((center, radius, color)),
            DrawCommand::Line { .. } => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, f32, Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => Some((from, to, width, color)),
            DrawCommand::Disk { .. } => None,
        })
    }

    pub fn disk_count(&self) -> usize {
        self.disks().count()
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }
}

impl DrawSurface for DrawList {
    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn fill_disk(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Disk {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_drops_recorded_commands() {
        let mut list = DrawList::new();
        let white = Rgba::rgb(1.0, 1.0, 1.0);
        list.fill_disk(Vec2::ZERO, 1.0, white);
        list.stroke_line(Vec2::ZERO, Vec2::ONE, 1.0, white);
        assert_eq!(list.disk_count(), 1);
        assert_eq!(list.line_count(), 1);

        list.clear();
        assert!(list.commands().is_empty());
        assert_eq!(list.clears(), 1);
    }
}
