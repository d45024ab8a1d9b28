//! Per-frame update step
//!
//! Advances the frame state by one tick. Step order matters: each step sees
//! the results of the ones before it within the same tick.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use super::collision::{Edge, beyond_margin, circles_overlap, clamp_inside, pursuit_velocity};
use super::state::{
    Enemy, EnemyKind, FrameState, GameEvent, Particle, Phase, PowerUp, PowerUpKind, Projectile,
};
use crate::consts::*;
use crate::heading;
use crate::palette::{self, Rgba};

/// Held input flags for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Single shot heading (straight up in screen space)
pub const SHOT_ANGLE: f32 = -PI / 2.0;
/// Multishot spread: center, right, left
pub const MULTISHOT_ANGLES: [f32; 3] = [-PI / 2.0, -PI / 2.5, -PI / 1.6];

/// Advance the frame state by one tick
///
/// Returns the HUD notifications produced along the way. Nothing happens once
/// the frame is over or while the surface has no area.
pub fn tick(state: &mut FrameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != Phase::Playing || state.is_degenerate() {
        return events;
    }

    // 1. Clock and stability decay
    state.frame_count += 1;
    state.clock_ms += TICK_MS;
    state.stability = (state.stability - STABILITY_DECAY).max(0.0);
    if state.stability <= 0.0 {
        events.push(GameEvent::StabilityChanged(0.0));
        end_session(state, &mut events, "stability collapsed");
        return events;
    }

    // 2. Movement
    move_player(state, input);

    // 3. Firing
    fire(state, input);

    // 4. Enemy spawning
    state.spawn_timer_ms += TICK_MS as f32;
    if state.spawn_timer_ms > state.difficulty.config().spawn_interval_ms {
        spawn_enemy(state);
        state.spawn_timer_ms = 0.0;
    }

    // 5. Shake decay and shield countdown
    if state.screen_shake > 0.0 {
        state.screen_shake *= SHAKE_DECAY;
    }
    if state.effects.shield > 0 {
        state.effects.shield -= 1;
    }

    // 6. Projectiles
    let bounds = state.bounds;
    for projectile in &mut state.projectiles {
        projectile.pos += projectile.vel;
    }
    state
        .projectiles
        .retain(|p| !beyond_margin(p.pos, bounds, PROJECTILE_MARGIN));

    // 7. Enemies: pursuit, player hits, projectile kills
    if update_enemies(state, &mut events) {
        return events;
    }

    // 8. Pickups
    collect_powerups(state, &mut events);

    // 9. Particles
    for particle in &mut state.particles {
        particle.pos += particle.vel;
        particle.alpha -= PARTICLE_FADE;
        particle.life -= PARTICLE_FADE;
    }
    state.particles.retain(|p| p.alpha > 0.0);

    events.push(GameEvent::StabilityChanged(
        state.stability.clamp(0.0, MAX_STABILITY),
    ));
    events
}

fn end_session(state: &mut FrameState, events: &mut Vec<GameEvent>, reason: &str) {
    let score = state.player.score;
    log::info!("Game over ({reason}) at tick {} with score {score}", state.frame_count);
    state.phase = Phase::Over;
    events.push(GameEvent::GameOver { score });
}

fn move_player(state: &mut FrameState, input: &TickInput) {
    let mut speed = state.player.speed;
    if state.effects.speed > 0 {
        speed *= SPEED_BOOST;
        state.effects.speed -= 1;
    }

    let mut dir = Vec2::ZERO;
    if input.up {
        dir.y -= 1.0;
    }
    if input.down {
        dir.y += 1.0;
    }
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }

    let player = &mut state.player;
    player.pos = clamp_inside(player.pos + dir * speed, player.radius, state.bounds);
}

fn fire(state: &mut FrameState, input: &TickInput) {
    let cooldown = if state.effects.rapid > 0 {
        state.effects.rapid -= 1;
        SHOT_COOLDOWN_MS / RAPID_DIVISOR
    } else {
        SHOT_COOLDOWN_MS
    };

    if !input.fire {
        return;
    }
    let ready = state
        .last_shot_ms
        .is_none_or(|last| (state.clock_ms - last) as f32 > cooldown);
    if !ready {
        return;
    }

    let origin = state.player.pos;
    if state.effects.multishot > 0 {
        state.effects.multishot -= 1;
        for angle in MULTISHOT_ANGLES {
            state
                .projectiles
                .push(Projectile::new(origin, heading(angle) * PROJECTILE_SPEED));
        }
    } else {
        state
            .projectiles
            .push(Projectile::new(origin, heading(SHOT_ANGLE) * PROJECTILE_SPEED));
    }
    state.last_shot_ms = Some(state.clock_ms);
    state.screen_shake = SHAKE_ON_FIRE;
}

fn spawn_enemy(state: &mut FrameState) {
    let edge = Edge::ALL[state.rng.random_range(0..Edge::ALL.len())];
    let along = state.rng.random::<f32>();
    let pos = edge.spawn_point(along, state.bounds, SPAWN_MARGIN);
    let kind = EnemyKind::ALL[state.rng.random_range(0..EnemyKind::ALL.len())];
    log::debug!("Spawned {kind:?} at {pos} ({edge:?})");
    state.enemies.push(Enemy::new(kind, pos));
}

/// Returns true when the session ended during this step
fn update_enemies(state: &mut FrameState, events: &mut Vec<GameEvent>) -> bool {
    let enemy_speed = state.difficulty.config().enemy_speed;

    // Reverse so removals never skip a neighbour
    for i in (0..state.enemies.len()).rev() {
        let target = state.player.pos;
        let enemy = &mut state.enemies[i];
        enemy.vel = pursuit_velocity(enemy.pos, target, enemy_speed);
        enemy.pos += enemy.vel;

        if circles_overlap(enemy.pos, enemy.radius, target, state.player.radius) {
            let enemy = state.enemies.remove(i);
            if state.effects.shielded() {
                burst(state, enemy.pos, palette::POWERUP_SHIELD, BURST_SHIELD);
                continue;
            }

            state.player.lives = state.player.lives.saturating_sub(1);
            state.stability = (state.stability - HIT_PENALTY).max(0.0);
            state.screen_shake = SHAKE_ON_HIT;
            burst(state, enemy.pos, enemy.color, BURST_HIT);
            events.push(GameEvent::LivesChanged(state.player.lives));
            if state.player.lives == 0 {
                end_session(state, events, "out of lives");
                return true;
            }
            continue;
        }

        let enemy_pos = state.enemies[i].pos;
        let enemy_radius = state.enemies[i].radius;
        let hit = (0..state.projectiles.len()).rev().find(|&j| {
            let p = &state.projectiles[j];
            circles_overlap(p.pos, p.radius, enemy_pos, enemy_radius)
        });
        if let Some(j) = hit {
            let enemy = state.enemies.remove(i);
            state.projectiles.remove(j);
            state.player.score += enemy.points;
            events.push(GameEvent::ScoreChanged(state.player.score));
            state.stability = (state.stability + KILL_BONUS).min(MAX_STABILITY);
            burst(state, enemy.pos, enemy.color, BURST_KILL);

            if state.rng.random::<f32>() < POWERUP_DROP_CHANCE {
                let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
                log::debug!("{kind:?} dropped at {}", enemy.pos);
                state.powerups.push(PowerUp::new(kind, enemy.pos));
            }
        }
    }
    false
}

fn collect_powerups(state: &mut FrameState, events: &mut Vec<GameEvent>) {
    for i in (0..state.powerups.len()).rev() {
        let pickup = &state.powerups[i];
        if !circles_overlap(pickup.pos, pickup.radius, state.player.pos, state.player.radius) {
            continue;
        }
        let pickup = state.powerups.remove(i);
        match pickup.kind {
            PowerUpKind::Heart => {
                state.player.lives = (state.player.lives + 1).min(MAX_LIVES);
                events.push(GameEvent::LivesChanged(state.player.lives));
            }
            kind => state.effects.grant(kind, pickup.duration),
        }
        log::debug!("Collected {:?}", pickup.kind);
        burst(state, pickup.pos, pickup.color, BURST_PICKUP);
    }
}

/// Emit `count` particles scattering from `pos`
pub fn burst(state: &mut FrameState, pos: Vec2, color: Rgba, count: usize) {
    state.particles.reserve(count);
    for _ in 0..count {
        let radius = state.rng.random::<f32>() * 4.0 + 2.0;
        let vel = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * 2.0 * PARTICLE_MAX_SPEED,
            (state.rng.random::<f32>() - 0.5) * 2.0 * PARTICLE_MAX_SPEED,
        );
        state.particles.push(Particle {
            pos,
            vel,
            radius,
            color,
            alpha: 1.0,
            life: 1.0,
        });
    }
}
