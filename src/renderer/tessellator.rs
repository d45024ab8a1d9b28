//! Surface implementation that turns draw calls into colored triangles
//!
//! The resulting vertex list is what `RenderState::render` uploads each frame.

use glam::Vec2;

use super::font;
use super::shapes;
use super::surface::{Glow, Surface};
use super::vertex::Vertex;
use crate::palette::{Rgba, with_alpha};

/// Opacity of the innermost halo band
const GLOW_ALPHA: f32 = 0.35;
/// Number of bands a halo fades over
const GLOW_BANDS: u32 = 3;

#[derive(Debug, Clone, Copy)]
struct DrawState {
    offset: Vec2,
    alpha: f32,
    glow: Option<Glow>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            alpha: 1.0,
            glow: None,
        }
    }
}

pub struct Tessellator {
    size: Vec2,
    segments: u32,
    vertices: Vec<Vertex>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl Tessellator {
    pub fn new(size: Vec2, segments: u32) -> Self {
        Self {
            size,
            segments: segments.max(3),
            vertices: Vec::new(),
            state: DrawState::default(),
            stack: Vec::new(),
        }
    }

    /// Start a new frame, keeping the allocation
    pub fn begin(&mut self, size: Vec2, segments: u32) {
        self.size = size;
        self.segments = segments.max(3);
        self.vertices.clear();
        self.state = DrawState::default();
        self.stack.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn take_vertices(&mut self) -> Vec<Vertex> {
        std::mem::take(&mut self.vertices)
    }

    #[inline]
    fn at(&self, pos: Vec2) -> Vec2 {
        pos + self.state.offset
    }

    #[inline]
    fn tint(&self, color: Rgba) -> Rgba {
        with_alpha(color, color[3] * self.state.alpha)
    }

    fn push(&mut self, vertices: Vec<Vertex>) {
        self.vertices.extend(vertices);
    }

    /// Concentric halo bands fading outward from `radius`
    fn circle_halo(&mut self, center: Vec2, radii: Vec2) {
        let Some(glow) = self.state.glow else { return };
        let step = glow.blur / GLOW_BANDS as f32 / 2.0;
        for band in (0..GLOW_BANDS).rev() {
            let reach = step * (band + 1) as f32;
            let alpha = GLOW_ALPHA * (1.0 - band as f32 / GLOW_BANDS as f32);
            let color = self.tint(with_alpha(glow.color, glow.color[3] * alpha));
            let r = radii + Vec2::splat(reach);
            self.push(shapes::ellipse(center, r, color, self.segments));
        }
    }

    fn rect_halo(&mut self, min: Vec2, size: Vec2) {
        let Some(glow) = self.state.glow else { return };
        let step = glow.blur / GLOW_BANDS as f32 / 2.0;
        for band in (0..GLOW_BANDS).rev() {
            let reach = step * (band + 1) as f32;
            let alpha = GLOW_ALPHA * (1.0 - band as f32 / GLOW_BANDS as f32);
            let color = self.tint(with_alpha(glow.color, glow.color[3] * alpha));
            self.push(shapes::rounded_rect(
                min - Vec2::splat(reach),
                size + Vec2::splat(reach * 2.0),
                reach,
                color,
                self.segments,
            ));
        }
    }
}

impl Surface for Tessellator {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.state.offset += offset;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_glow(&mut self, glow: Option<Glow>) {
        self.state.glow = glow.filter(|g| g.blur > 0.0);
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        let min = self.at(min);
        self.rect_halo(min, size);
        let color = self.tint(color);
        self.push(shapes::quad(min, size, color));
    }

    fn fill_rounded_rect(&mut self, min: Vec2, size: Vec2, corner: f32, color: Rgba) {
        let min = self.at(min);
        self.rect_halo(min, size);
        let color = self.tint(color);
        self.push(shapes::rounded_rect(min, size, corner, color, self.segments));
    }

    fn fill_gradient(&mut self, min: Vec2, size: Vec2, top: Rgba, bottom: Rgba) {
        let min = self.at(min);
        let (top, bottom) = (self.tint(top), self.tint(bottom));
        self.push(shapes::gradient_quad(min, size, top, bottom));
    }

    fn stroke_rect(&mut self, min: Vec2, size: Vec2, width: f32, color: Rgba) {
        let min = self.at(min);
        let color = self.tint(color);
        self.push(shapes::rect_outline(min, size, width, color));
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let (from, to) = (self.at(from), self.at(to));
        let color = self.tint(color);
        self.push(shapes::segment(from, to, width, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.fill_ellipse(center, Vec2::splat(radius), color);
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        let center = self.at(center);
        let half = width / 2.0;
        if let Some(glow) = self.state.glow {
            let halo = self.tint(with_alpha(glow.color, glow.color[3] * GLOW_ALPHA));
            let reach = glow.blur / 2.0;
            self.push(shapes::ring(
                center,
                radius - half - reach,
                radius + half + reach,
                halo,
                self.segments,
            ));
        }
        let color = self.tint(color);
        self.push(shapes::ring(center, radius - half, radius + half, color, self.segments));
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Rgba) {
        let center = self.at(center);
        self.circle_halo(center, radii);
        let color = self.tint(color);
        self.push(shapes::ellipse(center, radii, color, self.segments));
    }

    fn fill_sector(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Rgba) {
        let center = self.at(center);
        let color = self.tint(color);
        self.push(shapes::sector(center, radius, start, end, color, self.segments));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        let points: Vec<Vec2> = points.iter().map(|&p| self.at(p)).collect();
        let color = self.tint(color);
        self.push(shapes::polygon(&points, color));
    }

    fn fill_text(&mut self, text: &str, center: Vec2, size: f32, color: Rgba) {
        let center = self.at(center);
        let color = self.tint(color);
        for cell in font::layout(text, center, size) {
            self.push(shapes::quad(cell.min, Vec2::splat(cell.size), color));
        }
    }
}
