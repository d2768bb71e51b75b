//! The live polling loop.
//!
//! Each iteration advances logical time by `config.live_step_secs`, applies
//! the lifecycle rules, hands the report to an observer, then sleeps for
//! `config.live_period_ms` of wall time.  The loop stops when its
//! [`CancelFlag`] is raised or the iteration limit is reached.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use pd_core::{DispatchRng, Tick};
use pd_spatial::RouteFinder;
use tracing::{debug, info};

use crate::{CoordinatorResult, DispatchCoordinator, DispatchObserver, SharedCoordinator};

/// Cooperative stop signal for [`run_live`].  Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiveSummary {
    pub iterations: u64,
    pub final_tick: Tick,
    /// Stopped by the flag rather than the iteration limit.
    pub cancelled:  bool,
}

/// Run the live loop on an exclusively borrowed coordinator.
///
/// `max_iterations = None` runs until `cancel` is raised.  The flag is
/// checked before every iteration, so a flag raised beforehand runs zero
/// iterations.  A tick error stops the loop and is returned.
pub fn run_live<R, F, O>(
    coord:          &mut DispatchCoordinator<R, F>,
    cancel:         &CancelFlag,
    observer:       &mut O,
    max_iterations: Option<u64>,
) -> CoordinatorResult<LiveSummary>
where
    R: DispatchRng,
    F: RouteFinder,
    O: DispatchObserver,
{
    let period = Duration::from_millis(coord.config().live_period_ms);
    let step_secs = coord.config().live_step_secs;
    info!(period_ms = coord.config().live_period_ms, step_secs, "live loop started");

    let (iterations, cancelled) = drive(period, cancel, max_iterations, || {
        let report = coord.step(step_secs)?;
        observer.on_tick(&report, &coord.view());
        Ok(())
    })?;

    let final_tick = coord.now();
    observer.on_live_end(final_tick);
    info!(iterations, tick = %final_tick, cancelled, "live loop stopped");
    Ok(LiveSummary { iterations, final_tick, cancelled })
}

impl<R: DispatchRng, F: RouteFinder> SharedCoordinator<R, F> {
    /// Run the live loop against the shared coordinator.
    ///
    /// The lock is held only while ticking and notifying the observer and is
    /// released for the sleep, so other holders of the handle can issue
    /// requests between iterations.
    pub fn run_live<O: DispatchObserver>(
        &self,
        cancel:         &CancelFlag,
        observer:       &mut O,
        max_iterations: Option<u64>,
    ) -> CoordinatorResult<LiveSummary> {
        let (period, step_secs) = self.with(|c| {
            (Duration::from_millis(c.config().live_period_ms), c.config().live_step_secs)
        });
        info!(period_ms = period.as_millis() as u64, step_secs, "shared live loop started");

        let (iterations, cancelled) = drive(period, cancel, max_iterations, || {
            self.with(|c| -> CoordinatorResult<()> {
                let report = c.step(step_secs)?;
                observer.on_tick(&report, &c.view());
                Ok(())
            })
        })?;

        let final_tick = self.with(|c| c.now());
        observer.on_live_end(final_tick);
        info!(iterations, tick = %final_tick, cancelled, "shared live loop stopped");
        Ok(LiveSummary { iterations, final_tick, cancelled })
    }
}

/// The polling cycle shared by both entry points: check the flag and the
/// limit, run one `iteration`, sleep `period`.  Returns the iteration count
/// and whether the flag stopped the loop.
fn drive(
    period:         Duration,
    cancel:         &CancelFlag,
    max_iterations: Option<u64>,
    mut iteration:  impl FnMut() -> CoordinatorResult<()>,
) -> CoordinatorResult<(u64, bool)> {
    let mut iterations = 0u64;
    let cancelled = loop {
        if cancel.is_cancelled() {
            break true;
        }
        if max_iterations.is_some_and(|max| iterations >= max) {
            break false;
        }

        iteration()?;
        iterations += 1;
        debug!(iterations, "live iteration complete");

        if !period.is_zero() {
            thread::sleep(period);
        }
    };
    Ok((iterations, cancelled))
}
