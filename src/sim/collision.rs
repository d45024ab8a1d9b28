//! Collision detection and motion helpers
//!
//! Everything in the market is a circle, so overlap is a distance check.

use glam::Vec2;

/// Circles overlap when their centers are closer than the sum of radii
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// Velocity that moves `from` straight toward `to` at `speed`
///
/// Zero when the two points coincide.
#[inline]
pub fn pursuit_velocity(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    (to - from).normalize_or_zero() * speed
}

/// Whether `pos` is further than `margin` outside the `[0, bounds]` rectangle
#[inline]
pub fn beyond_margin(pos: Vec2, bounds: Vec2, margin: f32) -> bool {
    pos.x < -margin || pos.x > bounds.x + margin || pos.y < -margin || pos.y > bounds.y + margin
}

/// Keep a circle of `radius` fully inside `[0, bounds]`
///
/// If the surface is smaller than the circle the circle is pinned to the
/// top-left inset rather than panicking.
#[inline]
pub fn clamp_inside(pos: Vec2, radius: f32, bounds: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.min(bounds.x - radius).max(radius),
        pos.y.min(bounds.y - radius).max(radius),
    )
}

/// Surface edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Point `margin` outside this edge, `t` (0-1) of the way along it
    pub fn spawn_point(self, t: f32, bounds: Vec2, margin: f32) -> Vec2 {
        match self {
            Edge::Top => Vec2::new(t * bounds.x, -margin),
            Edge::Right => Vec2::new(bounds.x + margin, t * bounds.y),
            Edge::Bottom => Vec2::new(t * bounds.x, bounds.y + margin),
            Edge::Left => Vec2::new(-margin, t * bounds.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap() {
        let a = Vec2::new(0.0, 0.0);
        assert!(circles_overlap(a, 22.0, Vec2::new(47.0, 0.0), 26.0));
        // Touching exactly is not a hit
        assert!(!circles_overlap(a, 22.0, Vec2::new(48.0, 0.0), 26.0));
        assert!(!circles_overlap(a, 6.0, Vec2::new(30.0, 30.0), 6.0));
    }

    #[test]
    fn test_pursuit_velocity() {
        let vel = pursuit_velocity(Vec2::new(0.0, 0.0), Vec2::new(30.0, 40.0), 2.0);
        assert!((vel.length() - 2.0).abs() < 1e-5);
        assert!((vel.x - 1.2).abs() < 1e-5);
        assert!((vel.y - 1.6).abs() < 1e-5);

        // On top of the target: no movement, no NaN
        let vel = pursuit_velocity(Vec2::ONE, Vec2::ONE, 2.0);
        assert_eq!(vel, Vec2::ZERO);
    }

    #[test]
    fn test_beyond_margin() {
        let bounds = Vec2::new(800.0, 600.0);
        assert!(!beyond_margin(Vec2::new(-99.0, 300.0), bounds, 100.0));
        assert!(beyond_margin(Vec2::new(-101.0, 300.0), bounds, 100.0));
        assert!(beyond_margin(Vec2::new(400.0, 701.0), bounds, 100.0));
        assert!(!beyond_margin(Vec2::new(900.0, 700.0), bounds, 100.0));
    }

    #[test]
    fn test_clamp_inside() {
        let bounds = Vec2::new(800.0, 600.0);
        assert_eq!(clamp_inside(Vec2::new(-5.0, 300.0), 22.0, bounds), Vec2::new(22.0, 300.0));
        assert_eq!(clamp_inside(Vec2::new(900.0, 700.0), 22.0, bounds), Vec2::new(778.0, 578.0));
        // Surface narrower than the player
        let tiny = clamp_inside(Vec2::new(5.0, 5.0), 22.0, Vec2::new(10.0, 10.0));
        assert_eq!(tiny, Vec2::new(22.0, 22.0));
    }

    #[test]
    fn test_spawn_points_are_outside() {
        let bounds = Vec2::new(800.0, 600.0);
        for edge in Edge::ALL {
            for t in [0.0, 0.5, 0.99] {
                let p = edge.spawn_point(t, bounds, 120.0);
                let outside = p.x < 0.0 || p.x > bounds.x || p.y < 0.0 || p.y > bounds.y;
                assert!(outside, "{edge:?} at {t} gave {p}");
            }
        }
    }
}
