//! LIFO log of compensating actions.
//!
//! Only parcel creation and dispatch are reversible.  There is no redo and
//! no grouping: each `pop` yields exactly one action for the caller to
//! apply.  An action whose parcel no longer exists is simply discarded by
//! the caller.

use std::fmt;

/// Which side effect an [`UndoAction`] reverses.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UndoKind {
    Create,
    Dispatch,
}

/// A recorded reversible side effect on one parcel.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UndoAction {
    pub kind:      UndoKind,
    pub parcel_id: String,
}

impl UndoAction {
    pub fn create(parcel_id: impl Into<String>) -> Self {
        Self { kind: UndoKind::Create, parcel_id: parcel_id.into() }
    }

    pub fn dispatch(parcel_id: impl Into<String>) -> Self {
        Self { kind: UndoKind::Dispatch, parcel_id: parcel_id.into() }
    }
}

impl fmt::Display for UndoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            UndoKind::Create   => write!(f, "undo create {}", self.parcel_id),
            UndoKind::Dispatch => write!(f, "undo dispatch {}", self.parcel_id),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UndoLog {
    stack: Vec<UndoAction>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: UndoAction) {
        self.stack.push(action);
    }

    pub fn pop(&mut self) -> Option<UndoAction> {
        self.stack.pop()
    }

    /// The action the next `pop` would return.
    pub fn peek(&self) -> Option<&UndoAction> {
        self.stack.last()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }
}
