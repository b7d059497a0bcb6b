//! Fast/slow tick bookkeeping for a single execution context.
//!
//! The schedule only does arithmetic on timestamps handed to it; whoever owns
//! the clock calls [`TickSchedule::poll`] and runs the ticks it reports, one
//! after the other, on the same context.

use log::warn;

/// Most fast ticks run in one poll before the backlog is dropped.
pub const MAX_CATCH_UP_TICKS: u32 = 10;

/// Ticks that came due since the previous poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DueTicks {
    /// Fast ticks to run, oldest first.
    pub fast: u32,
    /// Whether the statistics refresh is due (after the fast ticks).
    pub slow: bool,
}

impl DueTicks {
    pub fn is_empty(&self) -> bool {
        self.fast == 0 && !self.slow
    }
}

/// Deterministic millisecond schedule for the fast and slow ticks.
#[derive(Debug, Clone, Copy)]
pub struct TickSchedule {
    fast_period_ms: u64,
    slow_period_ms: u64,
    next_fast_ms: u64,
    next_slow_ms: u64,
    armed: bool,
}

impl TickSchedule {
    /// Both periods must be non-zero; see `MotionConfig::validate`.
    pub const fn new(fast_period_ms: u32, slow_period_ms: u32) -> Self {
        Self {
            fast_period_ms: fast_period_ms as u64,
            slow_period_ms: slow_period_ms as u64,
            next_fast_ms: 0,
            next_slow_ms: 0,
            armed: false,
        }
    }

    /// Forget every pending tick. The next poll restarts the schedule from
    /// its own timestamp and reports nothing due.
    ///
    /// Used after calibration: ticks that came due while it blocked are
    /// discarded rather than replayed against freshly reset state.
    pub fn rearm(&mut self) {
        self.armed = false;
    }

    /// Report the ticks due at `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> DueTicks {
        if !self.armed {
            self.armed = true;
            self.next_fast_ms = now_ms + self.fast_period_ms;
            self.next_slow_ms = now_ms + self.slow_period_ms;
            return DueTicks::default();
        }

        let mut due = DueTicks::default();

        if now_ms >= self.next_fast_ms {
            let behind = (now_ms - self.next_fast_ms) / self.fast_period_ms + 1;
            self.next_fast_ms += behind * self.fast_period_ms;

            if behind > MAX_CATCH_UP_TICKS as u64 {
                warn!(
                    "Tick loop {} ticks behind, dropping {}",
                    behind,
                    behind - MAX_CATCH_UP_TICKS as u64
                );
                due.fast = MAX_CATCH_UP_TICKS;
            } else {
                due.fast = behind as u32;
            }
        }

        if now_ms >= self.next_slow_ms {
            let behind = (now_ms - self.next_slow_ms) / self.slow_period_ms + 1;
            self.next_slow_ms += behind * self.slow_period_ms;
            due.slow = true;
        }

        due
    }

    /// Milliseconds until the next tick of either kind, 0 when one is due.
    pub fn until_next(&self, now_ms: u64) -> u64 {
        if !self.armed {
            return 0;
        }
        self.next_fast_ms.min(self.next_slow_ms).saturating_sub(now_ms)
    }
}
