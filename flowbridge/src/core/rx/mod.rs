//! # Reactive contracts
//!
//! Reactors consume outbound messages from an [`Observable`] and deliver inbound messages to an
//! [`Observer`]. This module defines both contracts together with a few building blocks:
//!
//! * [`Subscription`] is a disposable link between a producer and an observer.
//! * [`Subject`] is a hot multicast producer that can be fed from any thread.
//! * [`FnObserver`] turns closures into an observer.
//! * [`Notification`] is a materialized observer event.
//!
//! Everything else (operators, schedulers) is intentionally left to reactive libraries.

mod observer;
mod subject;
mod subscription;

pub use observer::{FnObserver, Notification};
pub(crate) use observer::Discard;
pub use subject::{Subject, SubjectObserver};
pub use subscription::{Subscription, SubscriptionState};

use crate::prelude::*;

/// Consumer of a stream of values.
///
/// An observer receives a sequence of [`Observer::on_next`] calls followed by at most one terminal
/// call: either [`Observer::on_error`] or [`Observer::on_completed`]. Producers are expected to
/// keep this contract; reactors guarantee it for the sinks they own.
pub trait Observer<T>: Send + 'static {
    /// Receives the next value.
    fn on_next(&mut self, value: T);

    /// Receives a terminal error.
    fn on_error(&mut self, error: Error);

    /// Receives a terminal completion.
    fn on_completed(&mut self);
}

/// Producer of a stream of values.
pub trait Observable<T> {
    /// Subscribes an observer.
    ///
    /// Returns a [`Subscription`] that stops emissions once disposed. Producers which finish during
    /// this call may return an already disposed subscription.
    fn subscribe<O: Observer<T>>(&self, observer: O) -> Subscription;
}

impl<T, O: Observer<T> + ?Sized> Observer<T> for Box<O> {
    fn on_next(&mut self, value: T) {
        (**self).on_next(value)
    }

    fn on_error(&mut self, error: Error) {
        (**self).on_error(error)
    }

    fn on_completed(&mut self) {
        (**self).on_completed()
    }
}
