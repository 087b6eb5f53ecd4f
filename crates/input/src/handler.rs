//! Held-key repeat handler for terminal environments.
//!
//! A movement key acts once when pressed and then repeats at a fixed cadence
//! for as long as it is held: sideways moves every [`MOVE_REPEAT_MS`], soft
//! drops every [`SOFT_DROP_REPEAT_MS`], rotations every [`ROTATE_REPEAT_MS`].
//! Only the most recently pressed key repeats.
//!
//! Supports terminals that do not emit key release events by using a timeout.
//! Repeats only start once a key has been held past a delay that is never
//! shorter than that timeout, so a single tap acts exactly once.

use std::time::Instant;

use arrayvec::ArrayVec;
use crossterm::event::{KeyCode, KeyEvent};

use crate::map::handle_key_event;
use crate::types::{GameAction, MOVE_REPEAT_MS, ROTATE_REPEAT_MS, SOFT_DROP_REPEAT_MS};

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state that triggers repeats.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Repeat cadence for a held action; `None` for actions that never repeat.
pub fn repeat_interval_ms(action: GameAction) -> Option<u32> {
    match action {
        GameAction::MoveLeft | GameAction::MoveRight => Some(MOVE_REPEAT_MS),
        GameAction::SoftDrop => Some(SOFT_DROP_REPEAT_MS),
        GameAction::RotateCw | GameAction::RotateCcw => Some(ROTATE_REPEAT_MS),
        GameAction::Pause | GameAction::NewGame => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeldKey {
    action: GameAction,
    interval_ms: u32,
    /// Set once the initial delay has elapsed.
    repeating: bool,
}

/// Tracks the held movement key and its repeat timer.
#[derive(Debug, Clone)]
pub struct InputHandler {
    held: Option<HeldKey>,
    repeat_accumulator: u32,
    last_key_time: Instant,
    key_release_timeout_ms: u32,
    repeat_delay_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            held: None,
            repeat_accumulator: 0,
            last_key_time: Instant::now(),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
            repeat_delay_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    /// Also raises the repeat delay to at least `timeout_ms`.
    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self.repeat_delay_ms = self.repeat_delay_ms.max(timeout_ms);
        self
    }

    /// Extra hold time before the first repeat, on top of the action's cadence.
    ///
    /// Only useful below the release timeout when the terminal reports key
    /// releases.
    pub fn with_repeat_delay_ms(mut self, delay_ms: u32) -> Self {
        self.repeat_delay_ms = delay_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Action currently repeating, if any
    pub fn held_action(&self) -> Option<GameAction> {
        self.held.map(|h| h.action)
    }

    /// Register a key press.
    ///
    /// Returns the action to apply now. Terminal auto-repeat presses of the
    /// key already held return `None`; the handler's own cadence applies.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<GameAction> {
        let action = handle_key_event(KeyEvent::from(code))?;
        let interval_ms = repeat_interval_ms(action)?;

        self.last_key_time = Instant::now();
        if self.held_action() == Some(action) {
            return None;
        }
        self.held = Some(HeldKey {
            action,
            interval_ms,
            repeating: false,
        });
        self.repeat_accumulator = 0;
        Some(action)
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        let released = handle_key_event(KeyEvent::from(code));
        if released.is_some() && released == self.held_action() {
            self.release();
        }
    }

    /// Advance the repeat timer, returning due repeats.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<GameAction, 32> {
        let mut actions = ArrayVec::<GameAction, 32>::new();

        // Auto-release when terminal does not emit release events.
        let time_since_last_key = self.last_key_time.elapsed().as_millis() as u32;
        if time_since_last_key > self.key_release_timeout_ms {
            self.release();
        }

        let Some(held) = self.held.as_mut() else {
            return actions;
        };

        self.repeat_accumulator = self.repeat_accumulator.saturating_add(elapsed_ms);
        loop {
            let due_ms = if held.repeating {
                held.interval_ms
            } else {
                self.repeat_delay_ms.saturating_add(held.interval_ms)
            };
            if self.repeat_accumulator < due_ms {
                break;
            }
            if actions.try_push(held.action).is_err() {
                self.repeat_accumulator = 0;
                break;
            }
            self.repeat_accumulator -= due_ms;
            held.repeating = true;
        }
        actions
    }

    pub fn reset(&mut self) {
        self.release();
        self.last_key_time = Instant::now();
    }

    fn release(&mut self) {
        self.held = None;
        self.repeat_accumulator = 0;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Terminal that reports releases: long timeout, no extra repeat delay.
    fn held_keys_handler() -> InputHandler {
        InputHandler::new()
            .with_key_release_timeout_ms(10_000)
            .with_repeat_delay_ms(0)
    }

    #[test]
    fn test_single_tap_acts_once_with_default_timeout() {
        let mut ih = InputHandler::new();

        for code in [KeyCode::Up, KeyCode::Left, KeyCode::Right, KeyCode::Down] {
            ih.reset();
            assert!(ih.handle_key_press(code).is_some());

            // No release event arrives; 16 ms frames keep coming.
            let mut extra = Vec::new();
            for _ in 0..15 {
                ih.last_key_time -= Duration::from_millis(16);
                extra.extend(ih.update(16));
            }
            assert!(extra.is_empty(), "{code:?} repeated after a tap: {extra:?}");
            assert_eq!(ih.held_action(), None);
        }
    }

    #[test]
    fn test_held_key_repeats_after_initial_delay() {
        let mut ih = InputHandler::new();
        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(GameAction::MoveLeft));

        // First repeat after the 150 ms delay plus one 100 ms cadence.
        assert!(ih.update(249).is_empty());
        assert_eq!(ih.update(1).as_slice(), &[GameAction::MoveLeft]);
        // Terminal auto-repeat keeps the key held; later repeats use the cadence.
        assert_eq!(ih.handle_key_press(KeyCode::Left), None);
        assert_eq!(ih.update(100).as_slice(), &[GameAction::MoveLeft]);
    }

    #[test]
    fn test_press_acts_immediately_then_repeats_at_cadence() {
        let mut ih = held_keys_handler();

        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(GameAction::MoveLeft));
        assert!(ih.update(99).is_empty());
        assert_eq!(ih.update(1).as_slice(), &[GameAction::MoveLeft]);
        assert_eq!(
            ih.update(200).as_slice(),
            &[GameAction::MoveLeft, GameAction::MoveLeft]
        );
    }

    #[test]
    fn test_soft_drop_and_rotate_cadence() {
        let mut ih = held_keys_handler();

        assert_eq!(ih.handle_key_press(KeyCode::Down), Some(GameAction::SoftDrop));
        assert_eq!(ih.update(132).len(), 2);

        assert_eq!(ih.handle_key_press(KeyCode::Up), Some(GameAction::RotateCw));
        assert!(ih.update(132).is_empty());
        assert_eq!(ih.update(1).as_slice(), &[GameAction::RotateCw]);
    }

    #[test]
    fn test_terminal_autorepeat_is_suppressed() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(10_000);
        assert_eq!(ih.handle_key_press(KeyCode::Right), Some(GameAction::MoveRight));
        assert_eq!(ih.handle_key_press(KeyCode::Char('d')), None);
    }

    #[test]
    fn test_control_keys_are_not_held() {
        let mut ih = InputHandler::new();
        assert_eq!(ih.handle_key_press(KeyCode::Enter), None);
        assert_eq!(ih.handle_key_press(KeyCode::Char('r')), None);
        assert_eq!(ih.held_action(), None);
    }

    #[test]
    fn test_release_stops_repeats() {
        let mut ih = held_keys_handler();
        ih.handle_key_press(KeyCode::Left);
        ih.handle_key_release(KeyCode::Right);
        assert_eq!(ih.held_action(), Some(GameAction::MoveLeft));

        ih.handle_key_release(KeyCode::Char('h'));
        assert!(ih.update(500).is_empty());
    }

    #[test]
    fn test_auto_release_triggers_after_timeout_without_key_release_events() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(50);

        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(GameAction::MoveLeft));

        // Simulate no key-release events by moving the last key time into the past.
        ih.last_key_time = Instant::now() - Duration::from_millis(51);

        assert!(ih.update(500).is_empty());
        assert_eq!(ih.held_action(), None);
    }

    #[test]
    fn test_reset_clears_held_state() {
        let mut ih = held_keys_handler();
        ih.handle_key_press(KeyCode::Down);
        ih.reset();
        assert!(ih.update(1_000).is_empty());
    }
}
