//! Injectable random source for every stochastic outcome in the engine.
//!
//! # Determinism strategy
//!
//! All randomness (signal loss, delivery success, road blockage, transit
//! duration, investigation outcome) is drawn through the [`DispatchRng`]
//! trait, which the coordinator owns as an explicit dependency.  Production
//! runs use [`SimRng`], seeded from `DispatchConfig::seed`, so the same seed
//! always replays the same session.  Tests use [`ScriptedRng`] to force a
//! specific branch without searching for a lucky seed.
//!
//! Every draw reduces to `below(n)`: a uniform integer in `[0, n)`.  Odds are
//! expressed as "draw below `n`, compare with a threshold", matching how the
//! lifecycle rules are stated (e.g. 80 % delivery success = `below(10) < 8`).

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── DispatchRng ───────────────────────────────────────────────────────────────

/// A source of uniform integer draws.
///
/// Implementors only provide [`below`](Self::below); the odds helpers are
/// derived from it so every implementation agrees on what a "hit" means.
pub trait DispatchRng {
    /// Uniform integer in `[0, n)`.  Returns 0 when `n == 0`.
    fn below(&mut self, n: u32) -> u32;

    /// `true` with probability `percent / 100`.
    #[inline]
    fn percent_hit(&mut self, percent: u32) -> bool {
        self.below(100) < percent
    }

    /// `true` with probability `per_mille / 1000`.
    #[inline]
    fn per_mille_hit(&mut self, per_mille: u32) -> bool {
        self.below(1000) < per_mille
    }

    /// Uniform integer in the inclusive range `[lo, hi]`.
    #[inline]
    fn between(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        lo + self.below(hi - lo + 1)
    }
}

impl<R: DispatchRng + ?Sized> DispatchRng for &mut R {
    #[inline]
    fn below(&mut self, n: u32) -> u32 {
        (**self).below(n)
    }
}

impl<R: DispatchRng + ?Sized> DispatchRng for Box<R> {
    #[inline]
    fn below(&mut self, n: u32) -> u32 {
        (**self).below(n)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Seedable production RNG.
///
/// Used only in single-threaded or explicitly synchronised contexts; the
/// coordinator is the sole owner.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}

impl DispatchRng for SimRng {
    #[inline]
    fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.0.gen_range(0..n)
    }
}

// ── ScriptedRng ───────────────────────────────────────────────────────────────

/// Replays a fixed sequence of draws, then repeats a fallback draw forever.
///
/// Each scripted value is clamped to `n - 1`, so `u32::MAX` always means
/// "the highest possible draw" and `0` always means "the lowest".  With the
/// default rule thresholds that makes the fallback-only rng pessimistic:
/// no signal loss, no delivery, no blockage, no recovery.
///
/// ```
/// use pd_core::{DispatchRng, ScriptedRng};
///
/// let mut rng = ScriptedRng::new([0, 7]).with_fallback(3);
/// assert_eq!(rng.below(10), 0);
/// assert_eq!(rng.below(5), 4);   // 7 clamped to n - 1
/// assert_eq!(rng.below(10), 3);  // script exhausted → fallback
/// ```
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    script:   VecDeque<u32>,
    fallback: u32,
}

impl ScriptedRng {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script:   values.into_iter().collect(),
            fallback: u32::MAX,
        }
    }

    /// An rng that always returns the same draw.
    pub fn constant(value: u32) -> Self {
        Self::new([]).with_fallback(value)
    }

    pub fn with_fallback(mut self, fallback: u32) -> Self {
        self.fallback = fallback;
        self
    }

    /// Append more draws to the end of the script.
    pub fn push(&mut self, values: impl IntoIterator<Item = u32>) {
        self.script.extend(values);
    }

    /// Draws still queued before the fallback takes over.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DispatchRng for ScriptedRng {
    fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        let raw = self.script.pop_front().unwrap_or(self.fallback);
        raw.min(n - 1)
    }
}
