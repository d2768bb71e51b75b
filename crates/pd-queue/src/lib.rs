//! `pd-queue` — the two ordering structures of the dispatch engine.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                 |
//! |-----------|----------------------------------------------------------|
//! | [`heap`]  | `PriorityDispatchQueue`, `QueueEntry`                    |
//! | [`undo`]  | `UndoLog`, `UndoAction`, `UndoKind`                      |
//!
//! Both structures hold non-owning handles (`ParcelKey` / parcel id); the
//! parcel records themselves live in the dispatch database.
//!
//! Neither operation here can fail: an empty heap or log is reported as
//! `None`, so this crate has no error type.

pub mod heap;
pub mod undo;


pub use heap::{PriorityDispatchQueue, QueueEntry};
pub use undo::{UndoAction, UndoKind, UndoLog};
