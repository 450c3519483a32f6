//! Tick-based dwell timer shared by the path-following motors.

use crate::clock::TickClock;

/// Observable state of a [`WaitTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    /// No wait is armed.
    Invalid,
    /// The wait has not elapsed yet.
    Running,
    /// The wait elapsed and has not been disarmed.
    Overdue,
}

/// Deadline expressed as a tick on a [`TickClock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaitTimer {
    end_tick: Option<u64>,
}

impl WaitTimer {
    /// Arms the timer to elapse `ms` milliseconds from the clock's current
    /// tick.
    pub fn arm(&mut self, clock: &dyn TickClock, ms: u64) {
        self.end_tick = Some(clock.tick_add_ms(ms));
    }

    /// Disarms the timer.
    pub const fn disarm(&mut self) {
        self.end_tick = None;
    }

    /// Tick at which the armed wait elapses.
    #[must_use]
    pub const fn end_tick(&self) -> Option<u64> {
        self.end_tick
    }

    /// Current state relative to `clock`.
    #[must_use]
    pub fn state(&self, clock: &dyn TickClock) -> WaitState {
        match self.end_tick {
            None => WaitState::Invalid,
            Some(end) if clock.current_tick() < end => WaitState::Running,
            Some(_) => WaitState::Overdue,
        }
    }

    /// Whether an armed wait is still pending.
    #[must_use]
    pub fn is_running(&self, clock: &dyn TickClock) -> bool {
        self.state(clock) == WaitState::Running
    }
}
