//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per displayed frame)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod init;
pub mod state;
pub mod tick;

pub use collision::{Edge, beyond_margin, circles_overlap, clamp_inside, pursuit_velocity};
pub use init::{generate_scenery, initialize};
pub use state::{
    ActiveEffects, Difficulty, DifficultyConfig, Enemy, EnemyKind, FrameState, GameEvent, Phase,
    Particle, Player, PowerUp, PowerUpKind, Projectile, Scenery,
};
pub use tick::{TickInput, burst, tick};
