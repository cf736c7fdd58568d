use glam::Vec2;
use rand::Rng;

use crate::config::FieldConfig;
use crate::particle::Particle;
use crate::viewport::Viewport;

/// One generation of particles. Rebuilt wholesale, never edited piecemeal.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

/// `floor(area / density)`.
pub fn particle_count(viewport: Viewport, density: f32) -> usize {
    (viewport.area() / density as f64).floor() as usize
}

impl ParticleStore {
    pub fn initialize<R: Rng + ?Sized>(
        viewport: Viewport,
        config: &FieldConfig,
        rng: &mut R,
    ) -> Self {
        let count = particle_count(viewport, config.density);
        let size_span = config.max_size - config.min_size;

        let particles = (0..count)
            .map(|_| {
                let size = config.min_size + rng.gen::<f32>() * size_span;
                let position = Vec2::new(
                    spawn_axis(viewport.width, size, rng.gen()),
                    spawn_axis(viewport.height, size, rng.gen()),
                );
                let direction = Vec2::new(
                    rng.gen::<f32>() * config.max_speed * 2.0 - config.max_speed,
                    rng.gen::<f32>() * config.max_speed * 2.0 - config.max_speed,
                );
                Particle::new(position, direction, size, config.color)
            })
            .collect();

        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }
}

/// Keeps a `2 * size` margin on both sides; centres the disk when the axis is too short for it.
fn spawn_axis(extent: f32, size: f32, r: f32) -> f32 {
    let span = extent - size * 4.0;
    if span <= 0.0 {
        return extent / 2.0;
    }
    size * 2.0 + r * span
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn count_scales_with_area() {
        assert_eq!(particle_count(Viewport::new(420.0, 420.0), 18_000.0), 9);
        assert_eq!(particle_count(Viewport::new(100.0, 179.0), 18_000.0), 0);
        assert_eq!(particle_count(Viewport::new(100.0, 180.0), 18_000.0), 1);
        assert_eq!(particle_count(Viewport::new(1920.0, 1080.0), 18_000.0), 115);
    }

    #[test]
    fn zero_area_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let store = ParticleStore::initialize(
            Viewport::new(0.0, 900.0),
            &FieldConfig::default(),
            &mut rng,
        );
        assert!(store.is_empty());
    }

    #[test]
    fn particles_spawn_inside_with_bounded_attributes() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = FieldConfig::default();
        let viewport = Viewport::new(800.0, 600.0);
        let store = ParticleStore::initialize(viewport, &config, &mut rng);
        assert_eq!(store.len(), 26);

        for p in store.iter() {
            assert!((1.0..3.0).contains(&p.size), "size {}", p.size);
            assert!(p.position.x - p.size >= 0.0 && p.position.x + p.size <= viewport.width);
            assert!(p.position.y - p.size >= 0.0 && p.position.y + p.size <= viewport.height);
            assert!(p.direction.x.abs() <= 0.2 && p.direction.y.abs() <= 0.2);
            assert_eq!(p.color, config.color);
        }
    }

    #[test]
    fn narrow_axis_centres_particles() {
        let mut rng = StdRng::seed_from_u64(3);
        let viewport = Viewport::new(2.0, 90_000.0);
        let store = ParticleStore::initialize(viewport, &FieldConfig::default(), &mut rng);
        assert_eq!(store.len(), 10);
        assert!(store.iter().all(|p| p.position.x == 1.0));
    }
}
