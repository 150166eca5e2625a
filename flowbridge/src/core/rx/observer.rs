use std::fmt::{Debug, Formatter};

use crate::core::rx::Observer;

use crate::prelude::*;

/// Materialized observer event.
#[derive(Clone, Debug)]
pub enum Notification<T> {
    /// Next value.
    Next(T),
    /// Terminal error.
    Error(Error),
    /// Terminal completion.
    Completed,
}

impl<T> Notification<T> {
    /// Returns `true` for [`Notification::Error`] and [`Notification::Completed`].
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Notification::Next(_))
    }

    /// Replays this notification to an observer.
    pub fn deliver<O: Observer<T> + ?Sized>(self, observer: &mut O) {
        match self {
            Notification::Next(value) => observer.on_next(value),
            Notification::Error(err) => observer.on_error(err),
            Notification::Completed => observer.on_completed(),
        }
    }
}

/// Observer built from closures.
///
/// Values are handled by the closure passed to [`FnObserver::new`]. Terminal events are ignored
/// unless handlers are set by [`FnObserver::with_error`] and [`FnObserver::with_completed`].
///
/// # Usage
///
/// ```rust
/// use std::sync::mpsc;
/// use flowbridge::core::rx::{FnObserver, Observer};
///
/// let (tx, rx) = mpsc::channel();
/// let mut observer = FnObserver::new(move |value: u32| tx.send(value).unwrap())
///     .with_completed(|| println!("done"));
///
/// Observer::<u32>::on_next(&mut observer, 42);
/// Observer::<u32>::on_completed(&mut observer);
///
/// assert_eq!(rx.recv().unwrap(), 42);
/// ```
pub struct FnObserver<N, E = fn(Error), C = fn()> {
    next: N,
    error: E,
    completed: C,
}

impl<N> FnObserver<N> {
    /// Creates an observer that passes values to `next`.
    pub fn new(next: N) -> Self {
        Self {
            next,
            error: |err| log::trace!("unhandled observer error: {err}"),
            completed: || {},
        }
    }
}

impl<N, E, C> FnObserver<N, E, C> {
    /// Sets a handler for a terminal error.
    pub fn with_error<F>(self, error: F) -> FnObserver<N, F, C>
    where
        F: FnMut(Error) + Send + 'static,
    {
        FnObserver {
            next: self.next,
            error,
            completed: self.completed,
        }
    }

    /// Sets a handler for a terminal completion.
    pub fn with_completed<F>(self, completed: F) -> FnObserver<N, E, F>
    where
        F: FnMut() + Send + 'static,
    {
        FnObserver {
            next: self.next,
            error: self.error,
            completed,
        }
    }
}

impl<T, N, E, C> Observer<T> for FnObserver<N, E, C>
where
    N: FnMut(T) + Send + 'static,
    E: FnMut(Error) + Send + 'static,
    C: FnMut() + Send + 'static,
{
    fn on_next(&mut self, value: T) {
        (self.next)(value)
    }

    fn on_error(&mut self, error: Error) {
        (self.error)(error)
    }

    fn on_completed(&mut self) {
        (self.completed)()
    }
}

impl<N, E, C> Debug for FnObserver<N, E, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnObserver").finish_non_exhaustive()
    }
}

/// Observer that discards everything.
///
/// Used as a sink type by reactors without inbound direction.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Discard;

impl<T> Observer<T> for Discard {
    fn on_next(&mut self, _: T) {}

    fn on_error(&mut self, _: Error) {}

    fn on_completed(&mut self) {}
}
