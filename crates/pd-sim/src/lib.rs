//! `pd-sim` — the dispatch coordinator.
//!
//! # Operation flow
//!
//! ```text
//! submit(request)   validate → quote → confirm → create parcel (Warehouse)
//!                   → enqueue → push Undo{Create}
//! process_next()    extract max (drop stale) → match agent → discover routes
//!                   → select → blockage roll (maybe reroute / return)
//!                   → assign agent → Loading → active list → push Undo{Dispatch}
//! tick(now)         advance every active parcel by the lifecycle rules,
//!                   release agents, prune the active list
//! ```
//!
//! Administrative operations (`report_missing`, `resolve_investigations`,
//! `cancel`, `undo_last`, road blocking, adding cities and roads) complete
//! the external surface.  Every mutating call validates before it mutates.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`coordinator`] | `DispatchCoordinator`                                     |
//! | [`builder`]     | `CoordinatorBuilder`                                      |
//! | [`types`]       | requests, quotes, outcomes, reports, `Session`            |
//! | [`view`]        | `DispatchView` (borrowed read-only state)                 |
//! | [`observer`]    | `DispatchObserver` trait, `NoopObserver`                  |
//! | [`live`]        | `run_live`, `CancelFlag`                                  |
//! | [`shared`]      | `SharedCoordinator` (mutex-serialised access)             |
//! | [`error`]       | `CoordinatorError`, `ErrorKind`, `CoordinatorResult<T>`   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let mut coord = CoordinatorBuilder::new(config, graph, agents, SimRng::new(42)).build()?;
//! coord.submit_confirmed(request, &Session::new("admin"))?;
//! let outcome = coord.process_next_recommended()?;
//! coord.tick(Tick(10))?;
//! ```

pub mod builder;
pub mod coordinator;
pub mod error;
pub mod live;
pub mod observer;
pub mod shared;
pub mod types;
pub mod view;


pub use builder::CoordinatorBuilder;
pub use coordinator::DispatchCoordinator;
pub use error::{CoordinatorError, CoordinatorResult, ErrorKind};
pub use live::{CancelFlag, LiveSummary, run_live};
pub use observer::{DispatchObserver, NoopObserver};
pub use shared::SharedCoordinator;
pub use types::{
    Dispatch, DispatchOutcome, InvestigationResult, ParcelRequest, Quote, Resolution, Session,
    Submission, TickReport, UndoOutcome,
};
pub use view::DispatchView;
