//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing millisecond counter, `Millis`.  The
//! engine never reads a wall clock itself: the host supplies `now` once per
//! tick and every decision inside that tick reuses it, so an agent cannot
//! "arrive" and "test" on two different sides of a tick boundary.
//!
//! The three loop timers (`last_tick`, `last_respawn`, `last_test`) live in a
//! `SimClock` value owned by the loop, so a new run starts from a fresh clock
//! instead of inheriting process-wide state.

use std::fmt;

// ── Millis ───────────────────────────────────────────────────────────────────

/// An absolute simulation timestamp (or a duration) in milliseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    /// Milliseconds elapsed from `earlier` to `self`.  Saturates at zero if a
    /// host hands us a timestamp that runs backwards.
    #[inline]
    pub fn since(self, earlier: Millis) -> Millis {
        Millis(self.0.saturating_sub(earlier.0))
    }

    /// Strict "more than `window` has passed since `earlier`" check used by
    /// every delay in the state machine.
    #[inline]
    pub fn exceeds(self, earlier: Millis, window: Millis) -> bool {
        self.since(earlier) > window
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl std::ops::Add for Millis {
    type Output = Millis;
    #[inline]
    fn add(self, rhs: Millis) -> Millis {
        Millis(self.0 + rhs.0)
    }
}

impl std::ops::Add<u64> for Millis {
    type Output = Millis;
    #[inline]
    fn add(self, rhs: u64) -> Millis {
        Millis(self.0 + rhs)
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The loop's timers.  Cheap to copy and holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Time of the tick currently being processed.
    pub now: Millis,
    /// Time of the previous tick; `now - last_tick` is the movement step.
    pub last_tick: Millis,
    /// Time the last agent was admitted by respawn.
    pub last_respawn: Millis,
    /// Time of the last global random single test.
    pub last_test: Millis,
    /// Number of ticks processed so far.
    pub ticks: u64,
}

impl SimClock {
    /// A clock whose timers all start at `start`.
    pub fn new(start: Millis) -> Self {
        Self {
            now:          start,
            last_tick:    start,
            last_respawn: start,
            last_test:    start,
            ticks:        0,
        }
    }

    /// Move to `now` and return the time elapsed since the previous tick.
    pub fn advance(&mut self, now: Millis) -> Millis {
        let now = now.max(self.now);
        let elapsed = now.since(self.last_tick);
        self.now = now;
        self.last_tick = now;
        self.ticks += 1;
        elapsed
    }

    /// `true` once more than `rate` has passed since the last respawn.
    #[inline]
    pub fn respawn_due(&self, rate: Millis) -> bool {
        self.now.exceeds(self.last_respawn, rate)
    }

    /// `true` once more than `interval` has passed since the last global test.
    #[inline]
    pub fn test_due(&self, interval: Millis) -> bool {
        self.now.exceeds(self.last_test, interval)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {} @ {}", self.ticks, self.now)
    }
}
