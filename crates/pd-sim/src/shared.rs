//! Mutex-serialised access to a coordinator from several threads.

use std::sync::{Arc, Mutex, PoisonError};

use pd_core::DispatchRng;
use pd_spatial::{DfsRouteFinder, RouteFinder};

use crate::DispatchCoordinator;

/// A cloneable handle to one coordinator behind a mutex.
///
/// Every operation runs inside [`with`](Self::with), so the live loop and
/// interactive requests never interleave within an operation.  A panic
/// while holding the lock does not poison later callers.
pub struct SharedCoordinator<R: DispatchRng, F: RouteFinder = DfsRouteFinder> {
    inner: Arc<Mutex<DispatchCoordinator<R, F>>>,
}

impl<R: DispatchRng, F: RouteFinder> SharedCoordinator<R, F> {
    pub fn new(coord: DispatchCoordinator<R, F>) -> Self {
        Self { inner: Arc::new(Mutex::new(coord)) }
    }

    /// Run `f` with exclusive access to the coordinator.
    pub fn with<T>(&self, f: impl FnOnce(&mut DispatchCoordinator<R, F>) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Recover the coordinator if this is the last handle.
    pub fn try_unwrap(self) -> Result<DispatchCoordinator<R, F>, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => Ok(mutex.into_inner().unwrap_or_else(PoisonError::into_inner)),
            Err(inner) => Err(Self { inner }),
        }
    }
}

impl<R: DispatchRng, F: RouteFinder> Clone for SharedCoordinator<R, F> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<R: DispatchRng, F: RouteFinder> From<DispatchCoordinator<R, F>> for SharedCoordinator<R, F> {
    fn from(coord: DispatchCoordinator<R, F>) -> Self {
        Self::new(coord)
    }
}
