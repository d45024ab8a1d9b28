//! Frame state and entity types
//!
//! Everything the update step mutates and the renderer reads lives here.
//! Variant constants (colors, points, durations) come from one lookup table
//! per enum so adding a variant touches a single place.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::palette::{self, Rgba};

/// Difficulty selection for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Per-difficulty tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyConfig {
    /// Enemy pursuit speed (px per tick)
    pub enemy_speed: f32,
    /// Simulated milliseconds between enemy spawns
    pub spawn_interval_ms: f32,
}

const DIFFICULTY_TABLE: [DifficultyConfig; 3] = [
    DifficultyConfig {
        enemy_speed: 1.2,
        spawn_interval_ms: 1400.0,
    },
    DifficultyConfig {
        enemy_speed: 2.0,
        spawn_interval_ms: 900.0,
    },
    DifficultyConfig {
        enemy_speed: 2.8,
        spawn_interval_ms: 600.0,
    },
];

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn config(self) -> DifficultyConfig {
        DIFFICULTY_TABLE[self as usize]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Whether the simulation is still advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// A termination condition fired; ticks are no-ops from now on
    Over,
}

/// Presentation-facing notifications produced by a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ScoreChanged(u64),
    LivesChanged(u8),
    /// Always clamped to 0..=100
    StabilityChanged(f32),
    GameOver { score: u64 },
}

/// The guardian
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgba,
    pub speed: f32,
    pub lives: u8,
    pub score: u64,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: PLAYER_RADIUS,
            color: palette::PLAYER,
            speed: PLAYER_SPEED,
            lives: START_LIVES,
            score: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Rgba,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: PROJECTILE_RADIUS,
            color: palette::PROJECTILE,
        }
    }
}

/// Food variants chasing the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Dumpling,
    Sushi,
    Ramen,
}

/// Constants attached to an enemy variant
#[derive(Debug, Clone, Copy)]
pub struct EnemyProfile {
    pub color: Rgba,
    pub points: u64,
}

const ENEMY_TABLE: [EnemyProfile; 3] = [
    EnemyProfile {
        color: palette::ENEMY_DUMPLING,
        points: 75,
    },
    EnemyProfile {
        color: palette::ENEMY_SUSHI,
        points: 75,
    },
    EnemyProfile {
        color: palette::ENEMY_RAMEN,
        points: 150,
    },
];

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Dumpling, EnemyKind::Sushi, EnemyKind::Ramen];

    pub fn profile(self) -> EnemyProfile {
        ENEMY_TABLE[self as usize]
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Rgba,
    pub kind: EnemyKind,
    pub points: u64,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2) -> Self {
        let profile = kind.profile();
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: ENEMY_RADIUS,
            color: profile.color,
            kind,
            points: profile.points,
        }
    }
}

/// Power-up variants dropped by defeated enemies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    MultiShot,
    Speed,
    Heart,
    Shield,
    Rapid,
}

/// Constants attached to a power-up variant
#[derive(Debug, Clone, Copy)]
pub struct PowerUpProfile {
    pub color: Rgba,
    /// Ticks added to the matching timer on pickup (0 for instant effects)
    pub grant: u32,
    /// Label drawn inside the pickup ring
    pub glyph: char,
}

const POWERUP_TABLE: [PowerUpProfile; 5] = [
    PowerUpProfile {
        color: palette::POWERUP_MULTI,
        grant: 100,
        glyph: 'M',
    },
    PowerUpProfile {
        color: palette::POWERUP_SPEED,
        grant: 600,
        glyph: '⚡',
    },
    PowerUpProfile {
        color: palette::POWERUP_HEART,
        grant: 0,
        glyph: '♥',
    },
    PowerUpProfile {
        color: palette::POWERUP_SHIELD,
        grant: 800,
        glyph: '◆',
    },
    PowerUpProfile {
        color: palette::POWERUP_RAPID,
        grant: 600,
        glyph: 'R',
    },
];

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::MultiShot,
        PowerUpKind::Speed,
        PowerUpKind::Heart,
        PowerUpKind::Shield,
        PowerUpKind::Rapid,
    ];

    pub fn profile(self) -> PowerUpProfile {
        POWERUP_TABLE[self as usize]
    }
}

#[derive(Debug, Clone)]
pub struct PowerUp {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgba,
    pub kind: PowerUpKind,
    /// Effect ticks granted on pickup
    pub duration: u32,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, pos: Vec2) -> Self {
        let profile = kind.profile();
        Self {
            pos,
            radius: POWERUP_RADIUS,
            color: profile.color,
            kind,
            duration: profile.grant,
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Rgba,
    /// Opacity, removed at 0
    pub alpha: f32,
    /// 1 at birth, fades with alpha (renderer shrinks by it)
    pub life: f32,
}

/// Remaining ticks of each timed power-up
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveEffects {
    /// Volleys, not ticks: decremented once per multishot volley
    pub multishot: u32,
    pub speed: u32,
    pub shield: u32,
    pub rapid: u32,
}

impl ActiveEffects {
    /// Extend the timer matching `kind`; repeated pickups add up
    pub fn grant(&mut self, kind: PowerUpKind, ticks: u32) {
        let timer = match kind {
            PowerUpKind::MultiShot => &mut self.multishot,
            PowerUpKind::Speed => &mut self.speed,
            PowerUpKind::Shield => &mut self.shield,
            PowerUpKind::Rapid => &mut self.rapid,
            PowerUpKind::Heart => return,
        };
        *timer = timer.saturating_add(ticks);
    }

    pub fn shielded(&self) -> bool {
        self.shield > 0
    }
}

/// A market stall along the side of the screen
#[derive(Debug, Clone)]
pub struct Stall {
    /// Top-center of the counter
    pub pos: Vec2,
    pub color: Rgba,
    pub size: f32,
    pub label: &'static str,
}

/// A paper lantern hanging over the market
#[derive(Debug, Clone)]
pub struct Lantern {
    pub pos: Vec2,
    pub color: Rgba,
    pub size: f32,
}

/// Background NPC
#[derive(Debug, Clone)]
pub struct Townsfolk {
    pub pos: Vec2,
    pub color: Rgba,
    /// Phase offset for the idle bob (radians)
    pub bounce_offset: f32,
}

/// Decorative entities; generated once per session, never touched by gameplay
#[derive(Debug, Clone, Default)]
pub struct Scenery {
    pub stalls: Vec<Stall>,
    pub lanterns: Vec<Lantern>,
    pub townsfolk: Vec<Townsfolk>,
}

/// Complete per-session state
#[derive(Debug, Clone)]
pub struct FrameState {
    /// Drawing surface size in pixels
    pub bounds: Vec2,
    pub difficulty: Difficulty,
    pub phase: Phase,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    pub scenery: Scenery,
    pub effects: ActiveEffects,
    pub stability: f32,
    /// Simulated milliseconds accumulated toward the next spawn
    pub spawn_timer_ms: f32,
    /// Simulated clock at the last volley
    pub last_shot_ms: Option<u64>,
    /// Simulated clock (ms)
    pub clock_ms: u64,
    /// Tick counter, also drives render animations
    pub frame_count: u64,
    /// Render-only jitter magnitude
    pub screen_shake: f32,
    /// Session RNG (spawns, drops, particles)
    pub rng: Pcg32,
}

impl FrameState {
    /// Current HUD values as events (used when a session starts)
    pub fn hud_events(&self) -> Vec<GameEvent> {
        vec![
            GameEvent::ScoreChanged(self.player.score),
            GameEvent::LivesChanged(self.player.lives),
            GameEvent::StabilityChanged(self.stability.clamp(0.0, MAX_STABILITY)),
        ]
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    /// True when the surface has no drawable area
    pub fn is_degenerate(&self) -> bool {
        self.bounds.x <= 0.0 || self.bounds.y <= 0.0
    }

    /// Track a viewport resize; the session keeps running
    pub fn resize(&mut self, bounds: Vec2) {
        self.bounds = bounds;
    }
}
