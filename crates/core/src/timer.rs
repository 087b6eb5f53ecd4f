//! Timer module - gravity tick scheduling
//!
//! The driver reports elapsed wall-clock time; the timer turns it into
//! [`TimerEvent::GravityTick`]s at the board's current interval. Time that
//! piles up (slow frames, a stalled terminal) is caught up with several ticks,
//! bounded by [`MAX_CATCH_UP_TICKS`].

/// Upper bound on ticks owed at once
pub const MAX_CATCH_UP_TICKS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    GravityTick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GravityTimer {
    interval_ms: u32,
    accumulated_ms: u32,
}

impl GravityTimer {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            accumulated_ms: 0,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Time accumulated towards the next tick
    pub fn pending_ms(&self) -> u32 {
        self.accumulated_ms
    }

    /// Change the interval. Time already accumulated carries over.
    pub fn set_interval(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms.max(1);
        self.clamp_backlog();
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0;
    }

    pub fn advance(&mut self, elapsed_ms: u32) {
        self.accumulated_ms = self.accumulated_ms.saturating_add(elapsed_ms);
        self.clamp_backlog();
    }

    /// Take one due tick, if any. Call until it returns `None`.
    pub fn poll(&mut self) -> Option<TimerEvent> {
        if self.accumulated_ms < self.interval_ms {
            return None;
        }
        self.accumulated_ms -= self.interval_ms;
        Some(TimerEvent::GravityTick)
    }

    fn clamp_backlog(&mut self) {
        let cap = self.interval_ms.saturating_mul(MAX_CATCH_UP_TICKS);
        self.accumulated_ms = self.accumulated_ms.min(cap);
    }
}
