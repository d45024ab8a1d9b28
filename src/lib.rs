//! Neon Night Market - a single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Seeded simulation (frame state, initializer, update step)
//! - `renderer`: Draw surface abstraction, scene painter, WebGPU pipeline
//! - `driver`: Update/render loop lifecycle
//! - `session`: Start / playing / game-over flow and HUD values
//! - `commentary`: End-of-run vendor shoutout from the text service
//! - `settings`: Player preferences

pub mod commentary;
pub mod driver;
pub mod palette;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use driver::{DriverState, FrameTicket, LoopDriver};
pub use session::{Hud, Session, SessionStatus};
pub use settings::{QualityPreset, Settings};
pub use sim::Difficulty;

/// Game configuration constants
pub mod consts {
    /// Simulated milliseconds per tick (one display frame)
    pub const TICK_MS: u64 = 16;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 22.0;
    pub const PLAYER_SPEED: f32 = 7.5;
    pub const START_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 5;
    /// Movement multiplier while the speed power-up is active
    pub const SPEED_BOOST: f32 = 1.6;

    /// Projectiles
    pub const PROJECTILE_RADIUS: f32 = 6.0;
    pub const PROJECTILE_SPEED: f32 = 10.0;
    /// Base cooldown between volleys (ms)
    pub const SHOT_COOLDOWN_MS: f32 = 160.0;
    /// Cooldown divisor while rapid-fire is active
    pub const RAPID_DIVISOR: f32 = 3.0;
    /// Projectiles further than this outside the surface are culled
    pub const PROJECTILE_MARGIN: f32 = 100.0;

    /// Enemies
    pub const ENEMY_RADIUS: f32 = 26.0;
    /// Enemies appear this far outside an edge
    pub const SPAWN_MARGIN: f32 = 120.0;

    /// Power-ups
    pub const POWERUP_RADIUS: f32 = 20.0;
    pub const POWERUP_DROP_CHANCE: f32 = 0.2;

    /// Stability meter
    pub const MAX_STABILITY: f32 = 100.0;
    pub const STABILITY_DECAY: f32 = 0.025;
    pub const HIT_PENALTY: f32 = 15.0;
    pub const KILL_BONUS: f32 = 1.2;

    /// Screen shake
    pub const SHAKE_ON_FIRE: f32 = 2.0;
    pub const SHAKE_ON_HIT: f32 = 15.0;
    pub const SHAKE_DECAY: f32 = 0.85;
    /// Below this the renderer skips the jitter
    pub const SHAKE_VISIBLE: f32 = 0.1;

    /// Particles
    pub const PARTICLE_FADE: f32 = 0.035;
    pub const PARTICLE_MAX_SPEED: f32 = 8.0;
    pub const BURST_DEFAULT: usize = 12;
    pub const BURST_HIT: usize = 15;
    pub const BURST_SHIELD: usize = 15;
    pub const BURST_KILL: usize = 20;
    pub const BURST_PICKUP: usize = 25;
}

/// Direction of travel for a shot fired at `angle` (radians, screen space)
#[inline]
pub fn heading(angle: f32) -> glam::Vec2 {
    glam::Vec2::new(angle.cos(), angle.sin())
}
