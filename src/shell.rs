//! Menu / pause / game-over shell around the play session
//!
//! One owner holds the current screen plus the shared context (session and
//! leaderboard). Screens never hold references to each other.

use crate::highscores::{HighScoreEntry, HighScores};
use crate::sim::{EnterFrom, GameEvent, LeaveTo, Session, SessionPhase, TickInput, tick};
use crate::tuning::Tuning;

/// Which screen the shell is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    Paused,
    /// Run over; `rank` is the leaderboard slot it earned, if any
    GameOver { score: u32, rank: Option<usize> },
}

/// Top-level game: screen state machine plus shared context
#[derive(Debug, Clone)]
pub struct App {
    pub screen: Screen,
    pub session: Session,
    pub high_scores: HighScores,
}

impl App {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            screen: Screen::Menu,
            session: Session::new(seed, tuning),
            high_scores: HighScores::new(),
        }
    }

    /// Start a fresh run from the menu or the game-over screen
    pub fn start(&mut self) -> bool {
        let from = match self.screen {
            Screen::Menu => EnterFrom::Menu,
            Screen::GameOver { .. } => EnterFrom::GameOver,
            Screen::Playing | Screen::Paused => return false,
        };
        self.session.enter(from);
        self.screen = Screen::Playing;
        true
    }

    pub fn toggle_pause(&mut self) {
        match self.screen {
            Screen::Playing => {
                self.session.leave(LeaveTo::Paused);
                self.screen = Screen::Paused;
            }
            Screen::Paused => {
                self.session.enter(EnterFrom::Paused);
                self.screen = Screen::Playing;
            }
            _ => {}
        }
    }

    pub fn back_to_menu(&mut self) {
        if self.session.phase != SessionPhase::Inactive {
            self.session.leave(LeaveTo::Menu);
        }
        self.screen = Screen::Menu;
    }

    /// Run one host frame. Ticks the session while playing and reacts to
    /// its events; the events are handed back for sound/visual hooks.
    pub fn frame(&mut self, input: &TickInput, elapsed_ms: u32) -> Vec<GameEvent> {
        if self.screen != Screen::Playing {
            return Vec::new();
        }

        tick(&mut self.session, input, elapsed_ms);
        let events = self.session.drain_events();

        for event in &events {
            match event {
                GameEvent::PauseRequested => {
                    self.screen = Screen::Paused;
                }
                GameEvent::GameOver { reason } => {
                    let score = self.session.score;
                    let rank = self.high_scores.record(HighScoreEntry {
                        score,
                        survived_ms: self.session.time_ms,
                        reason: *reason,
                        timestamp: unix_millis(),
                    });
                    self.session.leave(LeaveTo::GameOver);
                    self.screen = Screen::GameOver { score, rank };
                }
                _ => {}
            }
        }

        events
    }
}

fn unix_millis() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}
