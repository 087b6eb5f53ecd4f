//! Session module - drives a board from actions and elapsed time
//!
//! A [`Session`] owns a [`Board`] and its [`GravityTimer`]. Front-ends feed it
//! [`GameAction`]s as they are decoded and wall-clock time once per frame; it
//! gates movement while paused or over, keeps the timer interval in step with
//! the speed level and collects the resulting [`GameEvent`]s.

use arrayvec::ArrayVec;
use tracing::debug;

use crate::board::{Board, TickOutcome};
use crate::error::GameError;
use crate::rng::{PieceSource, SimpleRng};
use crate::timer::{GravityTimer, TimerEvent};
use crate::types::{GameAction, GameEvent, Phase};

/// Events produced by one [`Session::advance`]
pub type SessionEvents = ArrayVec<GameEvent, 32>;

#[derive(Debug, Clone)]
pub struct Session<S = SimpleRng> {
    board: Board<S>,
    gravity: GravityTimer,
    start_level: u32,
}

impl<S: PieceSource> Session<S> {
    /// Wrap a board. Nothing runs until [`Session::start`].
    pub fn new(board: Board<S>, start_level: u32) -> Self {
        let gravity = GravityTimer::new(board.tick_interval_ms());
        Self {
            board,
            gravity,
            start_level,
        }
    }

    /// Start (or restart) a match at the configured level.
    pub fn start(&mut self) -> Result<(), GameError> {
        self.board.new_game(self.start_level)?;
        self.gravity = GravityTimer::new(self.board.tick_interval_ms());
        Ok(())
    }

    /// Feed one player action.
    ///
    /// Movement before the first match is an error; movement while paused or
    /// after game over is dropped.
    pub fn apply(&mut self, action: GameAction) -> Result<Option<GameEvent>, GameError> {
        match action {
            GameAction::NewGame => {
                self.start()?;
                return Ok(None);
            }
            GameAction::Pause => return self.board.toggle_pause(),
            _ => {}
        }

        match self.board.phase() {
            Phase::NotStarted => return Err(GameError::NotStarted),
            Phase::Paused | Phase::GameOver => return Ok(None),
            Phase::Running => {}
        }

        match action {
            GameAction::MoveLeft => {
                self.board.try_move(-1)?;
            }
            GameAction::MoveRight => {
                self.board.try_move(1)?;
            }
            GameAction::SoftDrop => {
                self.board.soft_drop()?;
            }
            GameAction::RotateCw | GameAction::RotateCcw => {
                let clockwise = action == GameAction::RotateCw;
                if self.board.try_rotate(clockwise)? {
                    return Ok(Some(GameEvent::RotationAccepted));
                }
            }
            GameAction::Pause | GameAction::NewGame => {}
        }
        Ok(None)
    }

    /// Advance play time by `elapsed_ms`, running any gravity ticks that fall due.
    pub fn advance(&mut self, elapsed_ms: u32) -> Result<SessionEvents, GameError> {
        let mut events = SessionEvents::new();
        if self.board.phase() == Phase::NotStarted {
            return Err(GameError::NotStarted);
        }

        self.board.advance_clock(elapsed_ms);
        if self.board.phase() != Phase::Running {
            return Ok(events);
        }

        self.gravity.advance(elapsed_ms);
        while let Some(TimerEvent::GravityTick) = self.gravity.poll() {
            let TickOutcome::Locked(report) = self.board.tick()? else {
                continue;
            };

            for event in report.events() {
                if events.try_push(event).is_err() {
                    break;
                }
            }
            if report.level_up.is_some() {
                self.gravity.set_interval(self.board.tick_interval_ms());
                debug!(interval_ms = self.gravity.interval_ms(), "gravity interval changed");
            }
            if report.game_over {
                self.gravity.reset();
                break;
            }
        }
        Ok(events)
    }
}

impl<S> Session<S> {
    pub fn board(&self) -> &Board<S> {
        &self.board
    }

    /// Mutable board access for staging positions.
    #[doc(hidden)]
    pub fn board_mut(&mut self) -> &mut Board<S> {
        &mut self.board
    }

    pub fn gravity(&self) -> &GravityTimer {
        &self.gravity
    }

    pub fn start_level(&self) -> u32 {
        self.start_level
    }
}
