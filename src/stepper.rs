use crate::particle::Particle;
use crate::surface::DrawSurface;
use crate::viewport::Viewport;

/// Advance one particle by one tick and draw it.
///
/// The bounce check looks at the position *before* the move, so a particle
/// can overshoot an edge by one tick of travel before it turns around. A
/// position exactly on an edge counts as inside.
pub fn step<S: DrawSurface + ?Sized>(particle: &mut Particle, viewport: Viewport, surface: &mut S) {
    advance(particle, viewport);
    particle.draw(surface);
}

/// The motion half of [`step`].
pub fn advance(particle: &mut Particle, viewport: Viewport) {
    if outside(particle.position.x, viewport.width) {
        particle.direction.x = -particle.direction.x;
    }
    if outside(particle.position.y, viewport.height) {
        particle.direction.y = -particle.direction.y;
    }
    particle.position += particle.direction;
}

fn outside(value: f32, extent: f32) -> bool {
    value > extent || value < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_COLOR;
    use crate::surface::DrawList;
    use glam::Vec2;

    fn particle(x: f32, y: f32, dx: f32, dy: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::new(dx, dy), 2.0, DEFAULT_COLOR)
    }

    #[test]
    fn moves_freely_inside() {
        let mut p = particle(10.0, 10.0, 0.2, -0.1);
        advance(&mut p, Viewport::new(100.0, 100.0));
        assert_eq!(p.direction, Vec2::new(0.2, -0.1));
        assert!((p.position - Vec2::new(10.2, 9.9)).length() < 1e-5);
    }

    #[test]
    fn on_boundary_does_not_flip() {
        let mut p = particle(100.0, 0.0, 0.2, -0.2);
        advance(&mut p, Viewport::new(100.0, 100.0));
        assert_eq!(p.direction, Vec2::new(0.2, -0.2));
        // Now past both edges: next tick turns around.
        advance(&mut p, Viewport::new(100.0, 100.0));
        assert_eq!(p.direction, Vec2::new(-0.2, 0.2));
    }

    #[test]
    fn outside_flips_before_moving() {
        let mut p = particle(100.5, -0.5, 0.2, -0.2);
        advance(&mut p, Viewport::new(100.0, 100.0));
        assert_eq!(p.direction, Vec2::new(-0.2, 0.2));
        assert!((p.position - Vec2::new(100.3, -0.3)).length() < 1e-5);
    }

    #[test]
    fn step_draws_at_new_position() {
        let mut p = particle(10.0, 10.0, 1.0, 1.0);
        let mut list = DrawList::new();
        step(&mut p, Viewport::new(100.0, 100.0), &mut list);

        let disks: Vec<_> = list.disks().collect();
        assert_eq!(disks, vec![(Vec2::new(11.0, 11.0), 2.0, DEFAULT_COLOR)]);
    }
}
