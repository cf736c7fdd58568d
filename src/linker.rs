//! Faint lines between neighbouring particles.

use crate::config::LinkParams;
use crate::particle::Particle;
use crate::surface::DrawSurface;
use crate::viewport::Viewport;

/// Opacity of a link between two particles `distance_sq` apart.
///
/// Goes negative past `fade`; callers only ask below the link threshold.
pub fn link_opacity(distance_sq: f32, params: &LinkParams) -> f32 {
    (1.0 - distance_sq / params.fade) * params.max_opacity
}

/// Draw one line per pair closer than the viewport's link threshold and
/// return how many were drawn.
///
/// Every unordered pair is visited once, so this is O(n²); the density
/// divisor keeps `n` small. Distances stay squared throughout.
pub fn link_all<S: DrawSurface + ?Sized>(
    particles: &[Particle],
    viewport: Viewport,
    params: &LinkParams,
    surface: &mut S,
) -> usize {
    let threshold = viewport.link_threshold(params.divisor);
    let mut drawn = 0;

    for (a, first) in particles.iter().enumerate() {
        let start = if params.self_pairs { a } else { a + 1 };
        for second in &particles[start..] {
            let distance_sq = first.position.distance_squared(second.position);
            if distance_sq < threshold {
                let opacity = link_opacity(distance_sq, params);
                let color = params.color.with_alpha(params.color.a * opacity);
                surface.stroke_line(first.position, second.position, params.width, color);
                drawn += 1;
            }
        }
    }

    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_COLOR;
    use crate::surface::DrawList;
    use glam::Vec2;

    fn at(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO, 1.0, DEFAULT_COLOR)
    }

    #[test]
    fn close_pair_gets_faded_line() {
        let particles = [at(0.0, 0.0), at(10.0, 10.0)];
        let params = LinkParams {
            self_pairs: false,
            ..LinkParams::default()
        };
        let mut list = DrawList::new();

        let drawn = link_all(&particles, Viewport::new(700.0, 700.0), &params, &mut list);
        assert_eq!(drawn, 1);

        let (from, to, width, color) = list.lines().next().unwrap();
        assert_eq!(from, Vec2::ZERO);
        assert_eq!(to, Vec2::new(10.0, 10.0));
        assert_eq!(width, 1.0);
        assert!((color.a - 0.1485).abs() < 1e-6, "opacity {}", color.a);
    }

    #[test]
    fn translucent_color_scales_opacity() {
        let particles = [at(0.0, 0.0), at(10.0, 10.0)];
        let params = LinkParams {
            self_pairs: false,
            color: DEFAULT_COLOR.with_alpha(0.5),
            ..LinkParams::default()
        };
        let mut list = DrawList::new();

        link_all(&particles, Viewport::new(700.0, 700.0), &params, &mut list);
        let (_, _, _, color) = list.lines().next().unwrap();
        assert!((color.a - 0.07425).abs() < 1e-6, "opacity {}", color.a);
    }

    #[test]
    fn self_pairs_add_one_line_per_particle() {
        let particles = [at(0.0, 0.0), at(10.0, 10.0), at(600.0, 600.0)];
        let mut list = DrawList::new();

        let drawn = link_all(
            &particles,
            Viewport::new(700.0, 700.0),
            &LinkParams::default(),
            &mut list,
        );
        // three self-links plus the one close pair
        assert_eq!(drawn, 4);
        let zero_length = list.lines().filter(|(a, b, _, _)| a == b).count();
        assert_eq!(zero_length, 3);
        assert!(list
            .lines()
            .filter(|(a, b, _, _)| a == b)
            .all(|(_, _, _, c)| (c.a - 0.15).abs() < 1e-6));
    }

    #[test]
    fn threshold_is_exclusive() {
        // threshold (700/7)^2 = 10000; distance² exactly 10000 is not linked.
        let particles = [at(0.0, 0.0), at(100.0, 0.0), at(0.0, 99.9)];
        let params = LinkParams {
            self_pairs: false,
            ..LinkParams::default()
        };
        let mut list = DrawList::new();

        let drawn = link_all(&particles, Viewport::new(700.0, 700.0), &params, &mut list);
        assert_eq!(drawn, 1);
        let (_, to, _, _) = list.lines().next().unwrap();
        assert_eq!(to, Vec2::new(0.0, 99.9));
    }

    #[test]
    fn degenerate_viewport_links_nothing() {
        let particles = [at(0.0, 0.0), at(0.0, 0.0)];
        let mut list = DrawList::new();
        let drawn = link_all(
            &particles,
            Viewport::new(0.0, 700.0),
            &LinkParams::default(),
            &mut list,
        );
        assert_eq!(drawn, 0);
    }

    #[test]
    fn opacity_passes_through_negative_values() {
        let params = LinkParams::default();
        assert!(link_opacity(30_000.0, &params) < 0.0);
        assert!((link_opacity(0.0, &params) - 0.15).abs() < 1e-6);
    }
}
