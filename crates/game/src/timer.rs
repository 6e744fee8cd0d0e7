//! Fixed-tick countdown timers.

use serde::{Deserialize, Serialize};

/// Time left before a delayed action fires.
///
/// Decremented once per fixed tick. Entities hold these as
/// `Option<Countdown>` and act when [`Countdown::tick`] reports expiry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
    fired: bool,
}

impl Countdown {
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration.max(0.0),
            fired: false,
        }
    }

    /// Advance by `delta_time`.
    ///
    /// Returns `true` on the tick the countdown reaches zero, and never again.
    pub fn tick(&mut self, delta_time: f32) -> bool {
        if self.fired {
            return false;
        }
        self.remaining = (self.remaining - delta_time).max(0.0);
        if self.remaining == 0.0 {
            self.fired = true;
            return true;
        }
        false
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.fired
    }
}

/// Advance an optional countdown. Returns `true` once, on expiry.
pub fn tick_optional(countdown: &mut Option<Countdown>, delta_time: f32) -> bool {
    countdown.as_mut().is_some_and(|c| c.tick(delta_time))
}
