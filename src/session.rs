//! Session flow: start menu, playing, game over
//!
//! Tracks the HUD values the page displays and hands out commentary requests
//! tagged with the session they belong to, so a late reply can never land on
//! a newer session.

use thiserror::Error;

use crate::commentary::{self, CommentaryError};
use crate::consts::{MAX_STABILITY, START_LIVES};
use crate::sim::{Difficulty, GameEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Start,
    Playing,
    GameOver,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Start => "start",
            SessionStatus::Playing => "playing",
            SessionStatus::GameOver => "game over",
        }
    }
}

/// Identifies one playing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(u64);

/// Ask the commentary collaborator for a shoutout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentaryRequest {
    pub token: SessionToken,
    pub score: u64,
    pub difficulty: Difficulty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} during {}", .status.as_str())]
    InvalidTransition {
        action: &'static str,
        status: SessionStatus,
    },
}

/// Values shown on the heads-up display and game-over screen
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub lives: u8,
    pub stability: f32,
    pub difficulty: Difficulty,
    /// `None` while the shoutout is still loading
    pub commentary: Option<String>,
}

impl Hud {
    fn fresh(difficulty: Difficulty) -> Self {
        Self {
            score: 0,
            lives: START_LIVES,
            stability: MAX_STABILITY,
            difficulty,
            commentary: None,
        }
    }

    pub fn difficulty_label(&self) -> &'static str {
        self.difficulty.as_str()
    }

    /// Stability rounded for display
    pub fn stability_percent(&self) -> u32 {
        self.stability.clamp(0.0, MAX_STABILITY).round() as u32
    }
}

#[derive(Debug)]
pub struct Session {
    status: SessionStatus,
    hud: Hud,
    token: SessionToken,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Start,
            hud: Hud::fresh(Difficulty::default()),
            token: SessionToken(0),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn difficulty(&self) -> Difficulty {
        self.hud.difficulty
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            status: self.status,
        }
    }

    /// Start → Playing with fresh HUD values
    pub fn start(&mut self, difficulty: Difficulty) -> Result<(), SessionError> {
        if self.status != SessionStatus::Start {
            return Err(self.invalid("start"));
        }
        self.token = SessionToken(self.token.0 + 1);
        self.hud = Hud::fresh(difficulty);
        self.status = SessionStatus::Playing;
        log::info!("Session {} started on {}", self.token.0, difficulty.as_str());
        Ok(())
    }

    /// Fold one simulation event into the HUD
    ///
    /// A game-over moves the session to `GameOver` and returns the commentary
    /// request for it.
    pub fn apply(&mut self, event: GameEvent) -> Result<Option<CommentaryRequest>, SessionError> {
        match event {
            GameEvent::ScoreChanged(score) => self.hud.score = score,
            GameEvent::LivesChanged(lives) => self.hud.lives = lives,
            GameEvent::StabilityChanged(stability) => {
                self.hud.stability = stability.clamp(0.0, MAX_STABILITY)
            }
            GameEvent::GameOver { score } => {
                if self.status != SessionStatus::Playing {
                    return Err(self.invalid("end the game"));
                }
                self.hud.score = score;
                self.hud.commentary = None;
                self.status = SessionStatus::GameOver;
                log::info!("Session {} over with {score} points", self.token.0);
                return Ok(Some(CommentaryRequest {
                    token: self.token,
                    score,
                    difficulty: self.hud.difficulty,
                }));
            }
        }
        Ok(None)
    }

    /// Apply a tick's worth of events in order
    pub fn apply_all(
        &mut self,
        events: impl IntoIterator<Item = GameEvent>,
    ) -> Result<Option<CommentaryRequest>, SessionError> {
        let mut request = None;
        for event in events {
            if let Some(r) = self.apply(event)? {
                request = Some(r);
            }
        }
        Ok(request)
    }

    /// GameOver → Start
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::GameOver {
            return Err(self.invalid("restart"));
        }
        self.status = SessionStatus::Start;
        Ok(())
    }

    /// Deliver the commentary result for `token`
    ///
    /// Returns false (and changes nothing) when the session has moved on.
    pub fn resolve_commentary(
        &mut self,
        token: SessionToken,
        result: Result<String, CommentaryError>,
    ) -> bool {
        if self.status != SessionStatus::GameOver || token != self.token {
            log::debug!("Ignoring commentary for session {}", token.0);
            return false;
        }
        self.hud.commentary = Some(commentary::text_or_fallback(result));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commentary::FALLBACK_COMMENTARY;

    fn playing(difficulty: Difficulty) -> Session {
        let mut session = Session::new();
        session.start(difficulty).unwrap();
        session
    }

    fn game_over(score: u64) -> (Session, CommentaryRequest) {
        let mut session = playing(Difficulty::Hard);
        let request = session
            .apply(GameEvent::GameOver { score })
            .unwrap()
            .unwrap();
        (session, request)
    }

    #[test]
    fn test_start_resets_hud() {
        let (mut session, request) = game_over(900);
        session.resolve_commentary(request.token, Ok("Neon Ninja!".to_string()));
        session.restart().unwrap();
        assert_eq!(session.hud().score, 900);

        session.start(Difficulty::Easy).unwrap();
        let hud = session.hud();
        assert_eq!(hud.score, 0);
        assert_eq!(hud.lives, 3);
        assert_eq!(hud.stability, 100.0);
        assert_eq!(hud.commentary, None);
        assert_eq!(hud.difficulty_label(), "EASY");
        assert_ne!(session.token(), request.token);
    }

    #[test]
    fn test_events_update_hud() {
        let mut session = playing(Difficulty::Normal);
        let request = session
            .apply_all([
                GameEvent::ScoreChanged(150),
                GameEvent::LivesChanged(2),
                GameEvent::StabilityChanged(84.6),
            ])
            .unwrap();
        assert!(request.is_none());
        let hud = session.hud();
        assert_eq!(hud.score, 150);
        assert_eq!(hud.lives, 2);
        assert_eq!(hud.stability_percent(), 85);
        assert_eq!(session.status(), SessionStatus::Playing);
    }

    #[test]
    fn test_game_over_requests_commentary() {
        let (session, request) = game_over(450);
        assert_eq!(session.status(), SessionStatus::GameOver);
        assert_eq!(request.score, 450);
        assert_eq!(request.difficulty, Difficulty::Hard);
        assert_eq!(request.token, session.token());
        assert_eq!(session.hud().commentary, None);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut session = Session::new();
        assert_eq!(
            session.restart(),
            Err(SessionError::InvalidTransition {
                action: "restart",
                status: SessionStatus::Start
            })
        );
        assert!(session.apply(GameEvent::GameOver { score: 1 }).is_err());

        session.start(Difficulty::Normal).unwrap();
        assert!(session.start(Difficulty::Normal).is_err());

        let err = session.restart().unwrap_err();
        assert_eq!(err.to_string(), "cannot restart during playing");
    }

    #[test]
    fn test_commentary_applies_once_for_live_session() {
        let (mut session, request) = game_over(75);
        assert!(session.resolve_commentary(request.token, Ok("  Dumpling Defender!  ".into())));
        assert_eq!(session.hud().commentary.as_deref(), Some("Dumpling Defender!"));
    }

    #[test]
    fn test_stale_commentary_is_ignored() {
        let (mut session, stale) = game_over(75);
        session.restart().unwrap();
        assert!(!session.resolve_commentary(stale.token, Ok("late".into())));

        session.start(Difficulty::Normal).unwrap();
        assert!(!session.resolve_commentary(stale.token, Ok("late".into())));
        let fresh = session.apply(GameEvent::GameOver { score: 10 }).unwrap().unwrap();
        assert!(!session.resolve_commentary(stale.token, Ok("late".into())));
        assert_eq!(session.hud().commentary, None);
        assert!(session.resolve_commentary(fresh.token, Ok("on time".into())));
        assert_eq!(session.hud().commentary.as_deref(), Some("on time"));
    }

    #[test]
    fn test_failures_fall_back() {
        let (mut session, request) = game_over(0);
        session.resolve_commentary(request.token, Err(CommentaryError::MissingApiKey));
        assert_eq!(session.hud().commentary.as_deref(), Some(FALLBACK_COMMENTARY));

        let (mut session, request) = game_over(0);
        session.resolve_commentary(request.token, Ok("   ".into()));
        assert_eq!(session.hud().commentary.as_deref(), Some(FALLBACK_COMMENTARY));
    }
}
