//! Immediate-mode drawing surface
//!
//! A small Canvas-2D-like API the scene painter draws through. Coordinates
//! are pixels with y pointing down. `save`/`restore` scope the translation,
//! alpha and glow state.

use glam::Vec2;

use crate::palette::Rgba;

/// Soft neon halo drawn behind filled shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    /// Halo reach in pixels
    pub blur: f32,
    pub color: Rgba,
}

pub trait Surface {
    /// Drawable size in pixels
    fn size(&self) -> Vec2;

    fn save(&mut self);
    fn restore(&mut self);
    /// Offset every later draw call (accumulates until restored)
    fn translate(&mut self, offset: Vec2);
    /// Global opacity multiplier
    fn set_alpha(&mut self, alpha: f32);
    fn set_glow(&mut self, glow: Option<Glow>);

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba);
    fn fill_rounded_rect(&mut self, min: Vec2, size: Vec2, corner: f32, color: Rgba);
    /// Vertical linear gradient from `top` to `bottom`
    fn fill_gradient(&mut self, min: Vec2, size: Vec2, top: Rgba, bottom: Rgba);
    fn stroke_rect(&mut self, min: Vec2, size: Vec2, width: f32, color: Rgba);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba);
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Rgba);
    /// Pie slice swept clockwise (screen space) from `start` to `end` radians
    fn fill_sector(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Rgba);
    /// Convex polygon
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);

    /// Text centered on `center`; `size` is the cap height in pixels
    fn fill_text(&mut self, text: &str, center: Vec2, size: f32, color: Rgba);
}
