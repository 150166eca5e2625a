//! Common utils.

pub(crate) mod sealed;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub(crate) use sealed::Sealed;

/// Acquires a mutex recovering from poisoning.
///
/// State guarded by `flowbridge` mutexes stays consistent between statements, so a panic in a
/// user callback on another thread does not invalidate it.
#[inline]
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
