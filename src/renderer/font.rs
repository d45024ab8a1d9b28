//! 3x5 pixel font for signs and pickup glyphs
//!
//! Each glyph is five rows of three bits (MSB on the left). Text is laid out
//! as a list of lit cells so any surface can fill them as rectangles.

use glam::Vec2;

pub const GLYPH_WIDTH: u32 = 3;
pub const GLYPH_HEIGHT: u32 = 5;
/// Horizontal advance in cells (one column of spacing)
pub const ADVANCE: u32 = GLYPH_WIDTH + 1;

/// Bitmap rows for a character; lowercase maps to uppercase
pub fn glyph(c: char) -> Option<[u8; 5]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b110],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ' ' => [0; 5],
        '♥' => [0b101, 0b111, 0b111, 0b010, 0b000],
        '◆' => [0b010, 0b111, 0b111, 0b111, 0b010],
        '⚡' => [0b001, 0b010, 0b111, 0b010, 0b100],
        _ => return None,
    };
    Some(rows)
}

/// A lit pixel of laid-out text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub min: Vec2,
    pub size: f32,
}

/// Lay out `text` centered on `center` with glyphs `height` pixels tall
///
/// Unknown characters advance like a space.
pub fn layout(text: &str, center: Vec2, height: f32) -> Vec<Cell> {
    let count = text.chars().count() as u32;
    if count == 0 || height <= 0.0 {
        return Vec::new();
    }
    let cell = height / GLYPH_HEIGHT as f32;
    let width_cells = count * ADVANCE - 1;
    let origin = center - Vec2::new(width_cells as f32, GLYPH_HEIGHT as f32) * cell / 2.0;

    let mut cells = Vec::new();
    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        let x0 = origin.x + (i as u32 * ADVANCE) as f32 * cell;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    cells.push(Cell {
                        min: Vec2::new(x0 + col as f32 * cell, origin.y + row as f32 * cell),
                        size: cell,
                    });
                }
            }
        }
    }
    cells
}
