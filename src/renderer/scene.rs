//! Scene painter
//!
//! Draws one frame of the market back-to-front onto any `Surface`. Reads the
//! frame state only; the screen shake jitter comes from the caller's RNG so
//! rendering never disturbs the simulation stream.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::surface::{Glow, Surface};
use crate::consts::SHAKE_VISIBLE;
use crate::palette::{self, Rgba};
use crate::settings::Settings;
use crate::sim::state::{
    Enemy, EnemyKind, FrameState, Lantern, Particle, Player, PowerUp, Projectile, Stall, Townsfolk,
};

const GRID_SPACING: f32 = 80.0;
const SCANLINE_SPACING: f32 = 4.0;
const SCANLINE_ALPHA: f32 = 0.08;

const AWNING_HEIGHT: f32 = 40.0;
const AWNING_STRIPES: usize = 5;

/// Paint the whole frame
pub fn render<S: Surface, R: Rng>(
    state: &FrameState,
    settings: &Settings,
    surface: &mut S,
    jitter: &mut R,
) {
    let size = surface.size();
    if size.x <= 0.0 || size.y <= 0.0 || state.is_degenerate() {
        return;
    }
    let frame = state.frame_count as f32;

    surface.save();
    if settings.effective_screen_shake() && state.screen_shake > SHAKE_VISIBLE {
        let offset = Vec2::new(
            (jitter.random::<f32>() - 0.5) * state.screen_shake,
            (jitter.random::<f32>() - 0.5) * state.screen_shake,
        );
        surface.translate(offset);
    }

    draw_background(surface, size);

    for stall in &state.scenery.stalls {
        draw_stall(surface, settings, stall);
    }
    for lantern in &state.scenery.lanterns {
        draw_lantern(surface, settings, lantern, frame);
    }
    for folk in &state.scenery.townsfolk {
        draw_townsfolk(surface, folk, frame);
    }

    for projectile in &state.projectiles {
        draw_projectile(surface, settings, projectile);
    }
    for enemy in &state.enemies {
        draw_enemy(surface, settings, enemy, frame);
    }
    for pickup in &state.powerups {
        draw_powerup(surface, settings, pickup, frame);
    }
    draw_player(surface, settings, &state.player, state.effects.shielded());

    for particle in state.particles.iter().take(settings.max_particles()) {
        draw_particle(surface, particle);
    }
    surface.restore();

    // Overlay stays put while the scene shakes
    if settings.scanlines {
        draw_scanlines(surface, size);
    }
}

fn glow<S: Surface>(surface: &mut S, settings: &Settings, blur: f32, color: Rgba) {
    if settings.glow() {
        surface.set_glow(Some(Glow { blur, color }));
    }
}

fn draw_background<S: Surface>(surface: &mut S, size: Vec2) {
    surface.fill_rect(Vec2::ZERO, size, palette::BACKGROUND);
    surface.fill_gradient(Vec2::ZERO, size, palette::FLOOR_TOP, palette::FLOOR_BOTTOM);

    let mut x = 0.0;
    while x < size.x {
        surface.line(Vec2::new(x, 0.0), Vec2::new(x, size.y), 1.0, palette::GRID);
        x += GRID_SPACING;
    }
    let mut y = 0.0;
    while y < size.y {
        surface.line(Vec2::new(0.0, y), Vec2::new(size.x, y), 1.0, palette::GRID);
        y += GRID_SPACING;
    }
}

fn draw_stall<S: Surface>(surface: &mut S, settings: &Settings, stall: &Stall) {
    let Stall {
        pos,
        color,
        size,
        label,
    } = *stall;
    let left = pos.x - size / 2.0;

    surface.save();
    glow(surface, settings, 20.0, color);

    // Counter
    surface.fill_rect(Vec2::new(left, pos.y), Vec2::new(size, size / 2.0), palette::STALL_COUNTER);

    // Striped awning
    let stripe = size / AWNING_STRIPES as f32;
    for j in 0..AWNING_STRIPES {
        let fill = if j % 2 == 0 { color } else { palette::WHITE };
        surface.fill_rect(
            Vec2::new(left + j as f32 * stripe, pos.y - AWNING_HEIGHT),
            Vec2::new(stripe, AWNING_HEIGHT),
            fill,
        );
    }

    // Neon sign
    let sign_min = Vec2::new(left + 5.0, pos.y - 65.0);
    let sign_size = Vec2::new(size - 10.0, 20.0);
    surface.fill_rect(sign_min, sign_size, palette::BLACK);
    surface.stroke_rect(sign_min, sign_size, 2.0, color);
    surface.fill_text(label, Vec2::new(pos.x, pos.y - 55.0), 8.0, color);

    // Shelf items
    for k in 0..3 {
        surface.fill_circle(Vec2::new(pos.x - 20.0 + k as f32 * 20.0, pos.y + 15.0), 6.0, color);
    }
    surface.restore();
}

fn draw_lantern<S: Surface>(surface: &mut S, settings: &Settings, lantern: &Lantern, frame: f32) {
    let sway = (frame * 0.04 + lantern.pos.x).sin() * 8.0;
    let center = lantern.pos + Vec2::new(sway, 0.0);
    let radii = Vec2::new(lantern.size, lantern.size * 1.3);

    surface.save();
    glow(surface, settings, 15.0, lantern.color);
    surface.fill_ellipse(center, radii, lantern.color);
    surface.set_glow(None);
    surface.fill_rect(
        Vec2::new(center.x - 6.0, center.y - radii.y - 2.0),
        Vec2::new(12.0, 4.0),
        palette::DARK,
    );
    surface.restore();
}

fn draw_townsfolk<S: Surface>(surface: &mut S, folk: &Townsfolk, frame: f32) {
    let bounce = (frame * 0.1 + folk.bounce_offset).sin() * 4.0;
    let base = folk.pos + Vec2::new(0.0, bounce);
    let head = base - Vec2::new(0.0, 10.0);

    surface.fill_circle(head, 8.0, folk.color);
    surface.fill_rect(base + Vec2::new(-10.0, -2.0), Vec2::new(20.0, 15.0), folk.color);
    surface.fill_circle(head - Vec2::new(3.0, 0.0), 1.5, palette::BLACK);
    surface.fill_circle(head + Vec2::new(3.0, 0.0), 1.5, palette::BLACK);
}

fn draw_projectile<S: Surface>(surface: &mut S, settings: &Settings, projectile: &Projectile) {
    surface.save();
    glow(surface, settings, 20.0, projectile.color);
    surface.fill_circle(projectile.pos, projectile.radius, projectile.color);
    surface.restore();
}

fn draw_enemy<S: Surface>(surface: &mut S, settings: &Settings, enemy: &Enemy, frame: f32) {
    let wobble = (frame * 0.2 + enemy.pos.x).sin() * 2.0;
    let bounce = (frame * 0.15 + enemy.pos.y).sin() * 3.0;
    let c = enemy.pos + Vec2::new(wobble, bounce);
    let r = enemy.radius;

    surface.save();
    glow(surface, settings, 15.0, enemy.color);
    match enemy.kind {
        EnemyKind::Dumpling => {
            // Dome over a square base
            surface.fill_sector(c, r, PI, TAU, enemy.color);
            surface.fill_rect(Vec2::new(c.x - r, c.y), Vec2::new(r * 2.0, r), enemy.color);
        }
        EnemyKind::Sushi => {
            surface.fill_rounded_rect(
                Vec2::new(c.x - r, c.y - r / 2.0),
                Vec2::new(r * 2.0, r),
                8.0,
                enemy.color,
            );
            surface.set_glow(None);
            // Nori band
            surface.fill_rect(
                Vec2::new(c.x - r / 2.0, c.y - r / 2.0),
                Vec2::new(r, r / 2.0),
                palette::DARK,
            );
        }
        EnemyKind::Ramen => {
            surface.fill_sector(c, r, 0.0, PI, enemy.color);
            surface.set_glow(None);
            surface.fill_rect(
                Vec2::new(c.x - r + 4.0, c.y - 4.0),
                Vec2::new(r * 2.0 - 8.0, 3.0),
                palette::WHITE,
            );
        }
    }
    surface.set_glow(None);

    for side in [-1.0, 1.0] {
        surface.fill_circle(c + Vec2::new(7.0 * side, 0.0), 3.0, palette::BLACK);
    }
    surface.set_alpha(0.6);
    for side in [-1.0, 1.0] {
        surface.fill_circle(c + Vec2::new(14.0 * side, 4.0), 3.0, palette::BLUSH);
    }
    surface.restore();
}

fn draw_powerup<S: Surface>(surface: &mut S, settings: &Settings, pickup: &PowerUp, frame: f32) {
    let pulse = 1.0 + (frame * 0.1).sin() * 0.15;

    surface.save();
    glow(surface, settings, 25.0, pickup.color);
    surface.stroke_circle(pickup.pos, pickup.radius * pulse, 4.0, pickup.color);
    surface.set_glow(None);
    let mut buf = [0u8; 4];
    let glyph = pickup.kind.profile().glyph.encode_utf8(&mut buf);
    surface.fill_text(glyph, pickup.pos, 16.0, palette::WHITE);
    surface.restore();
}

fn draw_player<S: Surface>(surface: &mut S, settings: &Settings, player: &Player, shielded: bool) {
    let p = player.pos;

    surface.save();
    if shielded {
        glow(surface, settings, 25.0, palette::POWERUP_SHIELD);
        surface.stroke_circle(p, player.radius + 15.0, 5.0, palette::POWERUP_SHIELD);
    }

    glow(surface, settings, 25.0, player.color);
    // Cat ears
    for side in [-1.0, 1.0] {
        let ear = [
            p + Vec2::new(14.0 * side, -14.0),
            p + Vec2::new(22.0 * side, -32.0),
            p + Vec2::new(4.0 * side, -14.0),
        ];
        surface.fill_polygon(&ear, player.color);
    }
    surface.fill_circle(p, player.radius, player.color);

    surface.set_glow(None);
    surface.fill_rect(p + Vec2::new(-18.0, -10.0), Vec2::new(36.0, 12.0), palette::VISOR);
    surface.fill_rect(p + Vec2::new(-16.0, -8.0), Vec2::new(32.0, 2.0), palette::NEON_PINK);
    surface.fill_circle(p + Vec2::new(0.0, 8.0), 5.0, palette::WHITE);
    surface.restore();
}

fn draw_particle<S: Surface>(surface: &mut S, particle: &Particle) {
    surface.save();
    surface.set_alpha(particle.alpha.clamp(0.0, 1.0));
    surface.fill_circle(particle.pos, particle.radius * particle.life.max(0.0), particle.color);
    surface.restore();
}

fn draw_scanlines<S: Surface>(surface: &mut S, size: Vec2) {
    surface.save();
    surface.set_alpha(SCANLINE_ALPHA);
    let mut y = 0.0;
    while y < size.y {
        surface.fill_rect(Vec2::new(0.0, y), Vec2::new(size.x, 1.0), palette::BLACK);
        y += SCANLINE_SPACING;
    }
    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::tessellator::Tessellator;
    use crate::settings::QualityPreset;
    use crate::sim::init::initialize;
    use crate::sim::state::{PowerUpKind, Projectile};
    use crate::sim::{Difficulty, burst};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Save,
        Restore,
        Translate(Vec2),
        Alpha(f32),
        Glow(Option<Glow>),
        Rect { min: Vec2, size: Vec2, color: Rgba },
        RoundedRect,
        Gradient,
        StrokeRect,
        Line,
        Circle { center: Vec2, radius: f32, color: Rgba },
        StrokeCircle { center: Vec2, color: Rgba },
        Ellipse,
        Sector { start: f32, end: f32 },
        Polygon,
        Text(String),
    }

    /// Test double that records every call
    struct RecordingSurface {
        size: Vec2,
        ops: Vec<Op>,
    }

    impl RecordingSurface {
        fn new(size: Vec2) -> Self {
            Self {
                size,
                ops: Vec::new(),
            }
        }

        fn position(&self, pred: impl Fn(&Op) -> bool) -> Option<usize> {
            self.ops.iter().position(pred)
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> Vec2 {
            self.size
        }
        fn save(&mut self) {
            self.ops.push(Op::Save);
        }
        fn restore(&mut self) {
            self.ops.push(Op::Restore);
        }
        fn translate(&mut self, offset: Vec2) {
            self.ops.push(Op::Translate(offset));
        }
        fn set_alpha(&mut self, alpha: f32) {
            self.ops.push(Op::Alpha(alpha));
        }
        fn set_glow(&mut self, glow: Option<Glow>) {
            self.ops.push(Op::Glow(glow));
        }
        fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
            self.ops.push(Op::Rect { min, size, color });
        }
        fn fill_rounded_rect(&mut self, _: Vec2, _: Vec2, _: f32, _: Rgba) {
            self.ops.push(Op::RoundedRect);
        }
        fn fill_gradient(&mut self, _: Vec2, _: Vec2, _: Rgba, _: Rgba) {
            self.ops.push(Op::Gradient);
        }
        fn stroke_rect(&mut self, _: Vec2, _: Vec2, _: f32, _: Rgba) {
            self.ops.push(Op::StrokeRect);
        }
        fn line(&mut self, _: Vec2, _: Vec2, _: f32, _: Rgba) {
            self.ops.push(Op::Line);
        }
        fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
            self.ops.push(Op::Circle {
                center,
                radius,
                color,
            });
        }
        fn stroke_circle(&mut self, center: Vec2, _: f32, _: f32, color: Rgba) {
            self.ops.push(Op::StrokeCircle { center, color });
        }
        fn fill_ellipse(&mut self, _: Vec2, _: Vec2, _: Rgba) {
            self.ops.push(Op::Ellipse);
        }
        fn fill_sector(&mut self, _: Vec2, _: f32, start: f32, end: f32, _: Rgba) {
            self.ops.push(Op::Sector { start, end });
        }
        fn fill_polygon(&mut self, _: &[Vec2], _: Rgba) {
            self.ops.push(Op::Polygon);
        }
        fn fill_text(&mut self, text: &str, _: Vec2, _: f32, _: Rgba) {
            self.ops.push(Op::Text(text.to_string()));
        }
    }

    const SIZE: Vec2 = Vec2::new(640.0, 480.0);

    fn paint(state: &FrameState, settings: &Settings) -> RecordingSurface {
        let mut surface = RecordingSurface::new(SIZE);
        let mut jitter = Pcg32::seed_from_u64(5);
        render(state, settings, &mut surface, &mut jitter);
        surface
    }

    fn is_scanline(op: &Op) -> bool {
        matches!(op, Op::Rect { size, color, .. } if size.y == 1.0 && *color == palette::BLACK)
    }

    #[test]
    fn test_zero_size_draws_nothing() {
        let state = initialize(SIZE, Difficulty::Normal, 1);
        let mut surface = RecordingSurface::new(Vec2::new(0.0, 480.0));
        render(&state, &Settings::default(), &mut surface, &mut Pcg32::seed_from_u64(1));
        assert!(surface.ops.is_empty());

        let degenerate = initialize(Vec2::ZERO, Difficulty::Normal, 1);
        let surface = paint(&degenerate, &Settings::default());
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn test_background_comes_first() {
        let state = initialize(SIZE, Difficulty::Normal, 1);
        let surface = paint(&state, &Settings::default());
        assert_eq!(surface.ops[0], Op::Save);
        assert_eq!(
            surface.ops[1],
            Op::Rect {
                min: Vec2::ZERO,
                size: SIZE,
                color: palette::BACKGROUND
            }
        );
        assert_eq!(surface.ops[2], Op::Gradient);
        // 640 / 80 vertical plus 480 / 80 horizontal grid lines
        let lines = surface.ops.iter().filter(|op| **op == Op::Line).count();
        assert_eq!(lines, 8 + 6);
    }

    #[test]
    fn test_scenery_is_drawn() {
        let state = initialize(SIZE, Difficulty::Normal, 1);
        let surface = paint(&state, &Settings::default());
        let labels: Vec<&Op> = surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Text(_)))
            .collect();
        assert_eq!(labels.len(), 12);
        assert_eq!(*labels[0], Op::Text("TAKOYAKI".to_string()));
        let lanterns = surface.ops.iter().filter(|op| **op == Op::Ellipse).count();
        assert_eq!(lanterns, 25);
    }

    #[test]
    fn test_draw_order() {
        let mut state = initialize(SIZE, Difficulty::Normal, 1);
        state
            .projectiles
            .push(Projectile::new(Vec2::new(100.0, 100.0), Vec2::ZERO));
        state
            .enemies
            .push(Enemy::new(EnemyKind::Dumpling, Vec2::new(200.0, 200.0)));
        state
            .powerups
            .push(PowerUp::new(PowerUpKind::Rapid, Vec2::new(300.0, 300.0)));
        burst(&mut state, Vec2::new(400.0, 400.0), palette::WHITE, 3);

        let surface = paint(&state, &Settings::default());
        let projectile = surface
            .position(|op| matches!(op, Op::Circle { center, .. } if *center == Vec2::new(100.0, 100.0)))
            .unwrap();
        let enemy = surface
            .position(|op| matches!(op, Op::Sector { start, .. } if *start == PI))
            .unwrap();
        let pickup = surface
            .position(|op| matches!(op, Op::StrokeCircle { color, .. } if *color == palette::POWERUP_RAPID))
            .unwrap();
        let player = surface.position(|op| *op == Op::Polygon).unwrap();
        let particle = surface
            .position(|op| matches!(op, Op::Alpha(a) if *a == 1.0))
            .unwrap();
        assert!(projectile < enemy);
        assert!(enemy < pickup);
        assert!(pickup < player);
        assert!(player < particle);
        assert!(surface.ops.contains(&Op::Text("R".to_string())));
    }

    #[test]
    fn test_enemy_shapes() {
        let mut state = initialize(SIZE, Difficulty::Normal, 1);
        state
            .enemies
            .push(Enemy::new(EnemyKind::Sushi, Vec2::new(200.0, 200.0)));
        state
            .enemies
            .push(Enemy::new(EnemyKind::Ramen, Vec2::new(300.0, 200.0)));
        let surface = paint(&state, &Settings::default());
        assert!(surface.ops.contains(&Op::RoundedRect));
        assert!(surface.ops.contains(&Op::Sector { start: 0.0, end: PI }));
        let blush = surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Circle { color, .. } if *color == palette::BLUSH))
            .count();
        assert_eq!(blush, 4);
    }

    #[test]
    fn test_scanlines_outside_shake() {
        let mut state = initialize(SIZE, Difficulty::Normal, 1);
        state.screen_shake = 10.0;
        let surface = paint(&state, &Settings::default());

        let Some(Op::Translate(offset)) = surface.ops.get(1).cloned() else {
            panic!("expected shake translation, got {:?}", surface.ops.get(1));
        };
        assert!(offset.x.abs() <= 5.0 && offset.y.abs() <= 5.0);

        // The shake scope closes before the overlay starts
        let first_scanline = surface.position(is_scanline).unwrap();
        let scope_end = surface.ops[..first_scanline]
            .iter()
            .rposition(|op| *op == Op::Restore)
            .unwrap();
        let depth: i32 = surface.ops[..=scope_end]
            .iter()
            .map(|op| match op {
                Op::Save => 1,
                Op::Restore => -1,
                _ => 0,
            })
            .sum();
        assert_eq!(depth, 0);
        let scanlines = surface.ops.iter().filter(|op| is_scanline(op)).count();
        assert_eq!(scanlines, 120);
    }

    #[test]
    fn test_shake_gated() {
        let mut state = initialize(SIZE, Difficulty::Normal, 1);
        state.screen_shake = 10.0;
        let calm = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let surface = paint(&state, &calm);
        assert!(!surface.ops.iter().any(|op| matches!(op, Op::Translate(_))));

        state.screen_shake = 0.05;
        let surface = paint(&state, &Settings::default());
        assert!(!surface.ops.iter().any(|op| matches!(op, Op::Translate(_))));
    }

    #[test]
    fn test_optional_effects() {
        let mut state = initialize(SIZE, Difficulty::Normal, 1);
        burst(&mut state, Vec2::new(50.0, 50.0), palette::WHITE, 5);
        let plain = Settings {
            quality: QualityPreset::Low,
            scanlines: false,
            particles: false,
            ..Settings::default()
        };
        let surface = paint(&state, &plain);
        assert!(!surface.ops.iter().any(is_scanline));
        assert!(!surface.ops.iter().any(|op| matches!(op, Op::Glow(Some(_)))));
        assert!(!surface.ops.iter().any(|op| matches!(op, Op::Alpha(a) if *a == 1.0)));
    }

    #[test]
    fn test_shield_ring() {
        let mut state = initialize(SIZE, Difficulty::Normal, 1);
        let surface = paint(&state, &Settings::default());
        let ring = |op: &Op| {
            matches!(op, Op::StrokeCircle { color, .. } if *color == palette::POWERUP_SHIELD)
        };
        assert!(!surface.ops.iter().any(ring));

        state.effects.shield = 10;
        let surface = paint(&state, &Settings::default());
        assert!(surface.ops.iter().any(ring));
    }

    #[test]
    fn test_render_does_not_touch_state() {
        let mut state = initialize(SIZE, Difficulty::Hard, 9);
        state.screen_shake = 12.0;
        let before = format!("{state:?}");
        paint(&state, &Settings::default());
        assert_eq!(format!("{state:?}"), before);
    }

    #[test]
    fn test_tessellated_frame() {
        let mut state = initialize(SIZE, Difficulty::Normal, 3);
        state
            .enemies
            .push(Enemy::new(EnemyKind::Sushi, Vec2::new(200.0, 200.0)));
        let settings = Settings::default();
        let mut tess = Tessellator::new(SIZE, settings.circle_segments());
        render(&state, &settings, &mut tess, &mut Pcg32::seed_from_u64(0));
        let vertices = tess.vertices();
        assert!(!vertices.is_empty());
        assert_eq!(vertices.len() % 3, 0);
        assert!(vertices.iter().all(|v| v.position.iter().all(|c| c.is_finite())));
        assert!(vertices.iter().all(|v| (0.0..=1.0).contains(&v.color[3])));
    }
}
