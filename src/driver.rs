//! Update/render loop lifecycle
//!
//! The driver owns the frame state while a session is playing. The display
//! callback asks for a `FrameTicket`, and redeeming it runs exactly one
//! update followed by one render. Stopping bumps the run generation so any
//! ticket still in flight becomes inert.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::renderer::{Surface, scene};
use crate::session::SessionStatus;
use crate::settings::Settings;
use crate::sim::{Difficulty, FrameState, GameEvent, TickInput, initialize, tick};

/// Seed for the render-side jitter stream
const JITTER_SEED: u64 = 0x5eed_5a4e;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Stopped,
    Running,
}

/// Permission to run one frame of a specific run
#[derive(Debug, PartialEq, Eq)]
pub struct FrameTicket {
    generation: u64,
}

impl FrameTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Keys the game listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Fire,
}

impl Control {
    /// Map a DOM `KeyboardEvent.key` / `code` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Control::Up),
            "ArrowDown" => Some(Control::Down),
            "ArrowLeft" => Some(Control::Left),
            "ArrowRight" => Some(Control::Right),
            " " | "Space" => Some(Control::Fire),
            _ => None,
        }
    }
}

pub struct LoopDriver {
    state: DriverState,
    generation: u64,
    outstanding: bool,
    bounds: Vec2,
    frame: Option<FrameState>,
    input: TickInput,
    jitter: Pcg32,
}

impl LoopDriver {
    pub fn new(bounds: Vec2) -> Self {
        Self {
            state: DriverState::Stopped,
            generation: 0,
            outstanding: false,
            bounds,
            frame: None,
            input: TickInput::default(),
            jitter: Pcg32::seed_from_u64(JITTER_SEED),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Frame state of the current (or last) session
    pub fn frame(&self) -> Option<&FrameState> {
        self.frame.as_ref()
    }

    pub fn frame_mut(&mut self) -> Option<&mut FrameState> {
        self.frame.as_mut()
    }

    pub fn input(&self) -> &TickInput {
        &self.input
    }

    /// Replace all held flags at once
    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    /// Press or release one control
    pub fn set_control(&mut self, control: Control, held: bool) {
        let flag = match control {
            Control::Up => &mut self.input.up,
            Control::Down => &mut self.input.down,
            Control::Left => &mut self.input.left,
            Control::Right => &mut self.input.right,
            Control::Fire => &mut self.input.fire,
        };
        *flag = held;
    }

    /// Apply a key event; returns true when the key is a game control
    pub fn handle_key(&mut self, key: &str, held: bool) -> bool {
        match Control::from_key(key) {
            Some(control) => {
                self.set_control(control, held);
                true
            }
            None => false,
        }
    }

    /// Follow the session status
    ///
    /// Entering `Playing` starts a fresh run and returns the initial HUD
    /// events; leaving it stops the loop.
    pub fn sync(&mut self, status: SessionStatus, difficulty: Difficulty, seed: u64) -> Vec<GameEvent> {
        match (status, self.state) {
            (SessionStatus::Playing, DriverState::Stopped) => self.start(difficulty, seed),
            (SessionStatus::Playing, DriverState::Running) => Vec::new(),
            (_, DriverState::Running) => {
                self.stop();
                Vec::new()
            }
            (_, DriverState::Stopped) => Vec::new(),
        }
    }

    fn start(&mut self, difficulty: Difficulty, seed: u64) -> Vec<GameEvent> {
        let frame = initialize(self.bounds, difficulty, seed);
        let events = frame.hud_events();
        self.frame = Some(frame);
        self.input = TickInput::default();
        self.generation += 1;
        self.outstanding = false;
        self.state = DriverState::Running;
        log::info!("Loop started (run {})", self.generation);
        events
    }

    /// Stop the loop; the last frame stays available for display
    pub fn stop(&mut self) {
        if self.state == DriverState::Running {
            log::info!("Loop stopped (run {})", self.generation);
        }
        self.state = DriverState::Stopped;
        self.generation += 1;
        self.outstanding = false;
    }

    /// Tear down: stop and drop the session
    pub fn unmount(&mut self) {
        self.stop();
        self.frame = None;
    }

    /// Track a viewport resize without resetting the session
    pub fn resize(&mut self, bounds: Vec2) {
        self.bounds = bounds;
        if let Some(frame) = self.frame.as_mut() {
            frame.resize(bounds);
        }
    }

    /// Request the next frame; at most one ticket is outstanding
    pub fn schedule(&mut self) -> Option<FrameTicket> {
        if self.state != DriverState::Running || self.outstanding {
            return None;
        }
        self.outstanding = true;
        Some(FrameTicket {
            generation: self.generation,
        })
    }

    /// Redeem a ticket: one update, then one render
    ///
    /// Tickets from a stopped run do nothing.
    pub fn run_frame<S: Surface>(
        &mut self,
        ticket: FrameTicket,
        settings: &Settings,
        surface: &mut S,
    ) -> Vec<GameEvent> {
        if ticket.generation != self.generation || self.state != DriverState::Running {
            log::debug!("Dropping stale frame ticket (run {})", ticket.generation);
            return Vec::new();
        }
        self.outstanding = false;

        let Some(frame) = self.frame.as_mut() else {
            return Vec::new();
        };
        let events = tick(frame, &self.input);
        scene::render(frame, settings, surface, &mut self.jitter);
        events
    }
}
