//! Shape generation for 2D primitives
//!
//! Every function returns a flat triangle list in pixel space.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::vertex::Vertex;
use crate::palette::Rgba;

/// Point on a circle (angle measured clockwise in screen space)
#[inline]
fn polar(center: Vec2, radius: Vec2, theta: f32) -> Vec2 {
    Vec2::new(
        center.x + radius.x * theta.cos(),
        center.y + radius.y * theta.sin(),
    )
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Generate vertices for a filled ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: Rgba, segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        // Triangle from center to edge
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(polar(center, radii, theta1), color));
        vertices.push(Vertex::at(polar(center, radii, theta2), color));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: Rgba,
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    let inner = Vec2::splat(inner_radius.max(0.0));
    let outer = Vec2::splat(outer_radius);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        let inner1 = polar(center, inner, theta1);
        let outer1 = polar(center, outer, theta1);
        let inner2 = polar(center, inner, theta2);
        let outer2 = polar(center, outer, theta2);

        // Two triangles per segment
        vertices.push(Vertex::at(inner1, color));
        vertices.push(Vertex::at(outer1, color));
        vertices.push(Vertex::at(inner2, color));

        vertices.push(Vertex::at(inner2, color));
        vertices.push(Vertex::at(outer1, color));
        vertices.push(Vertex::at(outer2, color));
    }

    vertices
}

/// Generate vertices for a pie slice from `start` to `end`
///
/// `segments` is the count for a full turn; partial sweeps use a share of it.
pub fn sector(
    center: Vec2,
    radius: f32,
    start: f32,
    end: f32,
    color: Rgba,
    segments: u32,
) -> Vec<Vertex> {
    let span = end - start;
    let count = ((span.abs() / TAU * segments as f32).ceil() as u32).max(2);
    let r = Vec2::splat(radius);
    let mut vertices = Vec::with_capacity((count * 3) as usize);

    for i in 0..count {
        let theta1 = start + span * (i as f32 / count as f32);
        let theta2 = start + span * ((i + 1) as f32 / count as f32);
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(polar(center, r, theta1), color));
        vertices.push(Vertex::at(polar(center, r, theta2), color));
    }

    vertices
}

/// Generate vertices for an axis-aligned rectangle
pub fn quad(min: Vec2, size: Vec2, color: Rgba) -> Vec<Vertex> {
    gradient_quad(min, size, color, color)
}

/// Rectangle shaded from `top` to `bottom`
pub fn gradient_quad(min: Vec2, size: Vec2, top: Rgba, bottom: Rgba) -> Vec<Vertex> {
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, top),
        Vertex::new(max.x, min.y, top),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(max.x, min.y, top),
        Vertex::new(max.x, max.y, bottom),
    ]
}

/// Rectangle outline centered on the rectangle edge
pub fn rect_outline(min: Vec2, size: Vec2, width: f32, color: Rgba) -> Vec<Vertex> {
    let h = width / 2.0;
    let max = min + size;
    let mut vertices = Vec::with_capacity(24);
    // Top and bottom span the full outer width; sides fill in between
    vertices.extend(quad(Vec2::new(min.x - h, min.y - h), Vec2::new(size.x + width, width), color));
    vertices.extend(quad(Vec2::new(min.x - h, max.y - h), Vec2::new(size.x + width, width), color));
    let side = Vec2::new(width, (size.y - width).max(0.0));
    vertices.extend(quad(Vec2::new(min.x - h, min.y + h), side, color));
    vertices.extend(quad(Vec2::new(max.x - h, min.y + h), side, color));
    vertices
}

/// Rectangle with circular corners
pub fn rounded_rect(min: Vec2, size: Vec2, corner: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    let r = corner.min(size.x / 2.0).min(size.y / 2.0).max(0.0);
    if r <= 0.0 {
        return quad(min, size, color);
    }
    let max = min + size;
    let mut vertices = Vec::new();

    // Center column plus the two side bands
    vertices.extend(quad(Vec2::new(min.x + r, min.y), Vec2::new(size.x - 2.0 * r, size.y), color));
    vertices.extend(quad(Vec2::new(min.x, min.y + r), Vec2::new(r, size.y - 2.0 * r), color));
    vertices.extend(quad(Vec2::new(max.x - r, min.y + r), Vec2::new(r, size.y - 2.0 * r), color));

    let corners = [
        (Vec2::new(max.x - r, max.y - r), 0.0),
        (Vec2::new(min.x + r, max.y - r), PI / 2.0),
        (Vec2::new(min.x + r, min.y + r), PI),
        (Vec2::new(max.x - r, min.y + r), PI * 1.5),
    ];
    for (center, start) in corners {
        vertices.extend(sector(center, r, start, start + PI / 2.0, color, segments));
    }
    vertices
}

/// Thick line segment
pub fn segment(from: Vec2, to: Vec2, width: f32, color: Rgba) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = from + perp;
    let a2 = from - perp;
    let b1 = to + perp;
    let b2 = to - perp;

    vec![
        Vertex::at(a1, color),
        Vertex::at(a2, color),
        Vertex::at(b1, color),
        Vertex::at(b1, color),
        Vertex::at(a2, color),
        Vertex::at(b2, color),
    ]
}

/// Triangle fan over a convex polygon
pub fn polygon(points: &[Vec2], color: Rgba) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::at(points[0], color));
        vertices.push(Vertex::at(pair[0], color));
        vertices.push(Vertex::at(pair[1], color));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::WHITE;

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        vertices.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), v| (lo.min(v.pos()), hi.max(v.pos())),
        )
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn test_circle_triangle_count() {
        let v = circle(Vec2::new(10.0, 10.0), 5.0, WHITE, 16);
        assert_eq!(v.len(), 16 * 3);
        let (lo, hi) = bounds(&v);
        assert!(close(lo, Vec2::new(5.0, 5.0)));
        assert!(close(hi, Vec2::new(15.0, 15.0)));
    }

    #[test]
    fn test_ring_stays_in_band() {
        let center = Vec2::new(50.0, 50.0);
        let v = ring(center, 20.0, 24.0, WHITE, 24);
        assert_eq!(v.len(), 24 * 6);
        for vertex in &v {
            let d = vertex.pos().distance(center);
            assert!((19.99..=24.01).contains(&d));
        }
    }

    #[test]
    fn test_half_sectors_point_the_right_way() {
        let c = Vec2::new(0.0, 0.0);
        // PI..TAU in y-down space is the upper half
        let upper = sector(c, 10.0, PI, TAU, WHITE, 32);
        assert!(upper.iter().all(|v| v.position[1] <= 1e-3));
        let lower = sector(c, 10.0, 0.0, PI, WHITE, 32);
        assert!(lower.iter().all(|v| v.position[1] >= -1e-3));
        assert_eq!(lower.len(), 16 * 3);
    }

    #[test]
    fn test_quad_and_gradient() {
        let v = gradient_quad(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), WHITE, [0.0; 4]);
        assert_eq!(v.len(), 6);
        let (lo, hi) = bounds(&v);
        assert_eq!(lo, Vec2::new(1.0, 2.0));
        assert_eq!(hi, Vec2::new(4.0, 6.0));
        for vertex in &v {
            let expected = if vertex.position[1] == 2.0 { WHITE } else { [0.0; 4] };
            assert_eq!(vertex.color, expected);
        }
    }

    #[test]
    fn test_rect_outline_centered_on_edge() {
        let v = rect_outline(Vec2::new(10.0, 10.0), Vec2::new(20.0, 10.0), 2.0, WHITE);
        assert_eq!(v.len(), 24);
        let (lo, hi) = bounds(&v);
        assert_eq!(lo, Vec2::new(9.0, 9.0));
        assert_eq!(hi, Vec2::new(31.0, 21.0));
    }

    #[test]
    fn test_rounded_rect_fits_box() {
        let v = rounded_rect(Vec2::new(0.0, 0.0), Vec2::new(52.0, 26.0), 8.0, WHITE, 24);
        let (lo, hi) = bounds(&v);
        assert!(lo.x >= -1e-3 && lo.y >= -1e-3);
        assert!(hi.x <= 52.001 && hi.y <= 26.001);
        // Corner is cut: nothing at the exact box corner
        assert!(!v.iter().any(|vertex| close(vertex.pos(), Vec2::ZERO)));
    }

    #[test]
    fn test_segment_width() {
        let v = segment(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 2.0, WHITE);
        let (lo, hi) = bounds(&v);
        assert_eq!(lo, Vec2::new(0.0, -1.0));
        assert_eq!(hi, Vec2::new(10.0, 1.0));
    }

    #[test]
    fn test_polygon_fan() {
        let tri = [Vec2::ZERO, Vec2::X, Vec2::Y];
        assert_eq!(polygon(&tri, WHITE).len(), 3);
        assert!(polygon(&tri[..2], WHITE).is_empty());
        let square = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        assert_eq!(polygon(&square, WHITE).len(), 6);
    }
}
