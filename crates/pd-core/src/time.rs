//! Logical time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter measured
//! in simulated seconds.  Every lifecycle deadline (loading window, arrival
//! time, retry window) is an absolute `Tick`, so all comparisons are exact
//! integer comparisons with no wall-clock drift.
//!
//! `SimClock` anchors tick 0 to a Unix timestamp so external renderers can
//! print human-readable times; the engine itself never reads the wall clock.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute logical timestamp, in simulated seconds since the clock origin.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` seconds after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Seconds elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the coordinator's notion of "now" and maps it to Unix seconds.
///
/// Manual operations (submit, dispatch, report missing) stamp history with
/// `current_tick`; `tick(now)` moves it forward.  The clock never runs
/// backwards: advancing to an earlier tick is ignored.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Unix timestamp (seconds since epoch) of tick 0.
    pub start_unix_secs: i64,
    /// The current logical time.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(start_unix_secs: i64) -> Self {
        Self {
            start_unix_secs,
            current_tick: Tick::ZERO,
        }
    }

    /// Move the clock to `tick` if it lies in the future.  Returns the
    /// resulting current tick.
    #[inline]
    pub fn advance_to(&mut self, tick: Tick) -> Tick {
        if tick > self.current_tick {
            self.current_tick = tick;
        }
        self.current_tick
    }

    /// Advance the clock by `secs` seconds.
    #[inline]
    pub fn advance_by(&mut self, secs: u64) -> Tick {
        self.current_tick = self.current_tick.offset(secs);
        self.current_tick
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.current_tick
    }

    /// Current Unix timestamp corresponding to `current_tick`.
    #[inline]
    pub fn current_unix_secs(&self) -> i64 {
        self.start_unix_secs + self.current_tick.0 as i64
    }

    /// Break elapsed time into (hour, minute, second) components.
    pub fn elapsed_hms(&self) -> (u64, u32, u32) {
        let total = self.current_tick.0;
        let hours = total / 3_600;
        let minutes = ((total % 3_600) / 60) as u32;
        let seconds = (total % 60) as u32;
        (hours, minutes, seconds)
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.elapsed_hms();
        write!(f, "{} ({:02}:{:02}:{:02})", self.current_tick, h, m, s)
    }
}
