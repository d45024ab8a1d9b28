//! Color palette shared by the simulation and the renderer
//!
//! Colors are linear RGBA floats so they can go straight into vertex data.

/// RGBA color, components in 0-1
pub type Rgba = [f32; 4];

/// Build an opaque color from a `0xRRGGBB` literal
pub const fn hex(rgb: u32) -> Rgba {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Same color with a different alpha
pub const fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    [color[0], color[1], color[2], alpha]
}

/// Convert HSL (hue in degrees, saturation/lightness 0-1) to an opaque color
pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Rgba {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m, 1.0]
}

pub const PLAYER: Rgba = hex(0x00ffff);
pub const PROJECTILE: Rgba = hex(0xffff00);

pub const ENEMY_DUMPLING: Rgba = hex(0xfff9c4);
pub const ENEMY_SUSHI: Rgba = hex(0xff5252);
pub const ENEMY_RAMEN: Rgba = hex(0xffa726);

pub const POWERUP_MULTI: Rgba = hex(0xff00ff);
pub const POWERUP_SPEED: Rgba = hex(0x00ffff);
pub const POWERUP_HEART: Rgba = hex(0xff2d55);
pub const POWERUP_SHIELD: Rgba = hex(0x3d5afe);
pub const POWERUP_RAPID: Rgba = hex(0xffd600);

/// Deep arcade indigo
pub const BACKGROUND: Rgba = hex(0x0c0c1e);
/// Wet pavement reflection gradient
pub const FLOOR_TOP: Rgba = hex(0x0c0c24);
pub const FLOOR_BOTTOM: Rgba = hex(0x1a1a3a);
pub const GRID: Rgba = hex(0x222244);

pub const NEON_PINK: Rgba = hex(0xff00ff);
pub const NEON_CYAN: Rgba = hex(0x00ffff);
pub const NEON_YELLOW: Rgba = hex(0xffff00);
pub const NEON_GREEN: Rgba = hex(0x00ff00);
pub const LANTERN: Rgba = hex(0xff4d4d);

pub const STALL_COUNTER: Rgba = hex(0x1a1a2e);
pub const VISOR: Rgba = hex(0x0a0a0a);
pub const DARK: Rgba = hex(0x111111);
pub const BLUSH: Rgba = hex(0xff99aa);
pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
pub const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgba, b: Rgba) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 0.01)
    }

    #[test]
    fn test_hex() {
        assert_eq!(hex(0xff0000), [1.0, 0.0, 0.0, 1.0]);
        assert!(close(hex(0x808080), [0.502, 0.502, 0.502, 1.0]));
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(close(hsl(0.0, 1.0, 0.5), [1.0, 0.0, 0.0, 1.0]));
        assert!(close(hsl(120.0, 1.0, 0.5), [0.0, 1.0, 0.0, 1.0]));
        assert!(close(hsl(240.0, 1.0, 0.5), [0.0, 0.0, 1.0, 1.0]));
        // Wraps around
        assert!(close(hsl(360.0, 1.0, 0.5), hsl(0.0, 1.0, 0.5)));
    }

    #[test]
    fn test_hsl_pastel_stays_in_range() {
        for step in 0..36 {
            let c = hsl(step as f32 * 10.0, 0.7, 0.7);
            assert!(c.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}
