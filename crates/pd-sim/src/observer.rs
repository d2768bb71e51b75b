//! Coordinator observer trait for monitors and exporters.

use pd_core::Tick;

use crate::{DispatchView, TickReport};

/// Callbacks invoked by [`run_live`][crate::run_live] on every iteration.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: status line printer
///
/// ```rust,ignore
/// struct StatusLine;
///
/// impl DispatchObserver for StatusLine {
///     fn on_tick(&mut self, report: &TickReport, view: &DispatchView<'_>) {
///         println!("{}: {} active, {} changed", report.tick, report.active, report.transitions.len());
///     }
/// }
/// ```
pub trait DispatchObserver {
    /// Called after each `tick`, with the report and a view of the state
    /// the tick left behind.
    fn on_tick(&mut self, _report: &TickReport, _view: &DispatchView<'_>) {}

    /// Called once when the live loop stops (cancelled or iteration limit).
    fn on_live_end(&mut self, _final_tick: Tick) {}
}

/// A [`DispatchObserver`] that does nothing.
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {}
