//! Session initializer
//!
//! Builds a fresh frame state, including the procedurally placed market.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{
    ActiveEffects, Difficulty, FrameState, Lantern, Phase, Player, Scenery, Stall, Townsfolk,
};
use crate::consts::MAX_STABILITY;
use crate::palette;

/// Shop signs cycled across the stall rows
pub const STALL_NAMES: [&str; 7] = ["TAKOYAKI", "RAMEN", "SUSHI", "BOBA", "GYOZA", "MOCHI", "BAO"];
/// Accent colors cycled across the stalls
pub const STALL_ACCENTS: [palette::Rgba; 4] = [
    palette::NEON_PINK,
    palette::NEON_CYAN,
    palette::NEON_YELLOW,
    palette::NEON_GREEN,
];

pub const STALL_COUNT: usize = 12;
pub const STALL_SIZE: f32 = 90.0;
/// Distance of the stall centers from the side edges
pub const STALL_INSET: f32 = 70.0;
pub const STALL_ROW_SPACING: f32 = 220.0;
pub const STALL_FIRST_ROW: f32 = 100.0;

pub const TOWNSFOLK_COUNT: usize = 30;
/// Width of the side bands the crowd stands in
pub const TOWNSFOLK_BAND: f32 = 120.0;
/// Crowd extends below the visible area
pub const TOWNSFOLK_OVERFLOW: f32 = 400.0;

pub const LANTERN_COUNT: usize = 25;
pub const LANTERN_SIZE: f32 = 14.0;

/// Create the frame state for a new session
///
/// The player starts centered with three lives and full stability; all
/// dynamic collections and timers are empty. The seed drives scenery layout
/// and every random choice the session makes afterwards.
pub fn initialize(bounds: Vec2, difficulty: Difficulty, seed: u64) -> FrameState {
    let mut rng = Pcg32::seed_from_u64(seed);
    let scenery = generate_scenery(bounds, &mut rng);

    log::info!(
        "New {} session {}x{} (seed {seed})",
        difficulty.as_str(),
        bounds.x,
        bounds.y
    );

    FrameState {
        bounds,
        difficulty,
        phase: Phase::Playing,
        player: Player::new(bounds / 2.0),
        projectiles: Vec::new(),
        enemies: Vec::new(),
        powerups: Vec::new(),
        particles: Vec::new(),
        scenery,
        effects: ActiveEffects::default(),
        stability: MAX_STABILITY,
        spawn_timer_ms: 0.0,
        last_shot_ms: None,
        clock_ms: 0,
        frame_count: 0,
        screen_shake: 0.0,
        rng,
    }
}

/// Lay out the night market: stall rows, crowd bands, lanterns
///
/// Counts are fixed; positions and crowd colors are random. Uses scaled unit
/// samples rather than ranges so a zero-sized surface is still valid.
pub fn generate_scenery(bounds: Vec2, rng: &mut impl Rng) -> Scenery {
    let stalls = (0..STALL_COUNT)
        .map(|i| {
            let left = i % 2 == 0;
            Stall {
                pos: Vec2::new(
                    if left { STALL_INSET } else { bounds.x - STALL_INSET },
                    (i / 2) as f32 * STALL_ROW_SPACING + STALL_FIRST_ROW,
                ),
                color: STALL_ACCENTS[i % STALL_ACCENTS.len()],
                size: STALL_SIZE,
                label: STALL_NAMES[i % STALL_NAMES.len()],
            }
        })
        .collect();

    let townsfolk = (0..TOWNSFOLK_COUNT)
        .map(|_| {
            let offset = rng.random::<f32>() * TOWNSFOLK_BAND;
            let x = if rng.random_bool(0.5) {
                offset
            } else {
                bounds.x - offset
            };
            Townsfolk {
                pos: Vec2::new(x, rng.random::<f32>() * (bounds.y + TOWNSFOLK_OVERFLOW)),
                color: palette::hsl(rng.random::<f32>() * 360.0, 0.7, 0.7),
                bounce_offset: rng.random::<f32>() * std::f32::consts::TAU,
            }
        })
        .collect();

    let lanterns = (0..LANTERN_COUNT)
        .map(|_| Lantern {
            pos: Vec2::new(rng.random::<f32>() * bounds.x, rng.random::<f32>() * bounds.y),
            color: palette::LANTERN,
            size: LANTERN_SIZE,
        })
        .collect();

    Scenery {
        stalls,
        lanterns,
        townsfolk,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameEvent;

    const SIZE: Vec2 = Vec2::new(1280.0, 720.0);

    #[test]
    fn test_initialize_fresh_state() {
        let state = initialize(SIZE, Difficulty::Hard, 7);
        assert_eq!(state.player.pos, Vec2::new(640.0, 360.0));
        assert_eq!(state.player.lives, 3);
        assert_eq!(state.player.score, 0);
        assert_eq!(state.stability, 100.0);
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.difficulty, Difficulty::Hard);
        assert!(state.projectiles.is_empty());
        assert!(state.enemies.is_empty());
        assert!(state.powerups.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.effects, ActiveEffects::default());
        assert_eq!(state.frame_count, 0);
        assert_eq!(state.last_shot_ms, None);
    }

    #[test]
    fn test_hud_events_report_initial_values() {
        let state = initialize(SIZE, Difficulty::Normal, 1);
        assert_eq!(
            state.hud_events(),
            vec![
                GameEvent::ScoreChanged(0),
                GameEvent::LivesChanged(3),
                GameEvent::StabilityChanged(100.0),
            ]
        );
    }

    #[test]
    fn test_scenery_layout() {
        let state = initialize(SIZE, Difficulty::Normal, 42);
        let scenery = &state.scenery;
        assert_eq!(scenery.stalls.len(), STALL_COUNT);
        assert_eq!(scenery.townsfolk.len(), TOWNSFOLK_COUNT);
        assert_eq!(scenery.lanterns.len(), LANTERN_COUNT);

        // Alternating sides, two stalls per row
        assert_eq!(scenery.stalls[0].pos, Vec2::new(70.0, 100.0));
        assert_eq!(scenery.stalls[1].pos, Vec2::new(1210.0, 100.0));
        assert_eq!(scenery.stalls[2].pos, Vec2::new(70.0, 320.0));
        assert_eq!(scenery.stalls[0].color, palette::NEON_PINK);
        assert_eq!(scenery.stalls[4].color, palette::NEON_PINK);
        assert_eq!(scenery.stalls[0].label, "TAKOYAKI");
        assert_eq!(scenery.stalls[7].label, "TAKOYAKI");

        for folk in &scenery.townsfolk {
            let in_band = folk.pos.x < TOWNSFOLK_BAND || folk.pos.x > SIZE.x - TOWNSFOLK_BAND;
            assert!(in_band, "townsfolk at {}", folk.pos);
            assert!(folk.pos.y >= 0.0 && folk.pos.y < SIZE.y + TOWNSFOLK_OVERFLOW);
        }
        for lantern in &scenery.lanterns {
            assert!(lantern.pos.x >= 0.0 && lantern.pos.x < SIZE.x);
            assert!(lantern.pos.y >= 0.0 && lantern.pos.y < SIZE.y);
        }
    }

    #[test]
    fn test_same_seed_same_market() {
        let a = initialize(SIZE, Difficulty::Easy, 99);
        let b = initialize(SIZE, Difficulty::Easy, 99);
        for (x, y) in a.scenery.lanterns.iter().zip(&b.scenery.lanterns) {
            assert_eq!(x.pos, y.pos);
        }
        for (x, y) in a.scenery.townsfolk.iter().zip(&b.scenery.townsfolk) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.color, y.color);
        }
    }

    #[test]
    fn test_zero_sized_surface_is_accepted() {
        let state = initialize(Vec2::ZERO, Difficulty::Normal, 3);
        assert!(state.is_degenerate());
        assert_eq!(state.scenery.lanterns.len(), LANTERN_COUNT);
    }
}
