//! Monotonic tick clock consumed by motors and the interpolator.
//!
//! The simulation advances in fixed ticks. Anything that waits converts its
//! millisecond duration into a future tick up front and compares against
//! [`TickClock::current_tick`] afterwards, so waits never depend on wall
//! time.

use crate::numeric::ms_to_ticks;
use crate::TICK_RATE_HZ;

/// Source of the current simulation tick.
#[cfg_attr(test, mockall::automock)]
pub trait TickClock {
    /// Tick currently being simulated.
    fn current_tick(&self) -> u64;

    /// Converts a duration in milliseconds into a tick count.
    fn ms_to_ticks(&self, ms: u64) -> u64;

    /// Tick at which a wait of `ms` milliseconds started now will elapse.
    fn tick_add_ms(&self, ms: u64) -> u64 {
        self.current_tick() + self.ms_to_ticks(ms)
    }
}

/// Clock advancing one tick per simulation step at a fixed rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRateClock {
    tick: u64,
    rate_hz: u32,
}

impl FixedRateClock {
    /// Creates a clock at tick zero. A zero rate falls back to
    /// [`TICK_RATE_HZ`].
    #[must_use]
    pub const fn new(rate_hz: u32) -> Self {
        Self::starting_at(0, rate_hz)
    }

    /// Creates a clock positioned at `tick`.
    #[must_use]
    pub const fn starting_at(tick: u64, rate_hz: u32) -> Self {
        let rate = if rate_hz == 0 { TICK_RATE_HZ } else { rate_hz };
        Self {
            tick,
            rate_hz: rate,
        }
    }

    /// Moves to the next tick and returns it.
    pub const fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Moves forward by `ticks` ticks.
    pub const fn advance_by(&mut self, ticks: u64) {
        self.tick += ticks;
    }

    /// Ticks per second.
    #[must_use]
    pub const fn rate_hz(&self) -> u32 {
        self.rate_hz
    }
}

impl Default for FixedRateClock {
    fn default() -> Self {
        Self::new(TICK_RATE_HZ)
    }
}

impl TickClock for FixedRateClock {
    fn current_tick(&self) -> u64 {
        self.tick
    }

    fn ms_to_ticks(&self, ms: u64) -> u64 {
        ms_to_ticks(ms, self.rate_hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn tick_add_ms_offsets_from_current_tick() {
        let clock = FixedRateClock::starting_at(100, 60);
        assert_eq!(clock.tick_add_ms(500), 130);
        assert_eq!(clock.tick_add_ms(0), 100);
    }

    #[rstest]
    fn zero_rate_falls_back_to_default() {
        let clock = FixedRateClock::new(0);
        assert_eq!(clock.rate_hz(), TICK_RATE_HZ);
    }

    #[rstest]
    fn advance_is_monotonic() {
        let mut clock = FixedRateClock::default();
        assert_eq!(clock.advance(), 1);
        clock.advance_by(9);
        assert_eq!(clock.current_tick(), 10);
    }
}
