use std::fmt::{Debug, Formatter};
use std::sync::{mpsc, Mutex};
use std::thread;

use crate::core::rx::{Observable, Observer, Subscription};
use crate::core::utils::lock;
use crate::sync::consts::RECEIVER_POOLING_INTERVAL;

use crate::prelude::*;

/// <sup>[`sync`](crate::sync)</sup>
/// Creates a cold producer which emits items of an iterator.
///
/// Every subscription spawns a thread which iterates over a fresh clone of `iter`, checks the
/// subscription before each emission and completes once the iterator is exhausted.
pub fn from_iter<I>(iter: I) -> IterProducer<I>
where
    I: IntoIterator + Clone + Send + 'static,
    I::Item: Send + 'static,
{
    IterProducer { iter }
}

/// <sup>[`sync`](crate::sync)</sup>
/// Creates a producer which emits values received from a channel.
///
/// The producer supports a single subscription. It completes once all senders are dropped.
pub fn from_receiver<T: Send + 'static>(rx: mpsc::Receiver<T>) -> ReceiverProducer<T> {
    ReceiverProducer {
        rx: Mutex::new(Some(rx)),
    }
}

/// <sup>[`sync`](crate::sync)</sup>
/// Producer created by [`from_iter`].
#[derive(Clone, Debug)]
pub struct IterProducer<I> {
    iter: I,
}

/// <sup>[`sync`](crate::sync)</sup>
/// Producer created by [`from_receiver`].
pub struct ReceiverProducer<T> {
    rx: Mutex<Option<mpsc::Receiver<T>>>,
}

impl<I> Observable<I::Item> for IterProducer<I>
where
    I: IntoIterator + Clone + Send + 'static,
    I::Item: Send + 'static,
{
    fn subscribe<O: Observer<I::Item>>(&self, mut observer: O) -> Subscription {
        let subscription = Subscription::new();
        let state = subscription.state();
        let iter = self.iter.clone();

        thread::spawn(move || {
            for item in iter {
                if state.is_disposed() {
                    log::trace!("iterator producer disposed");
                    return;
                }
                observer.on_next(item);
            }
            if !state.is_disposed() {
                observer.on_completed();
            }
        });

        subscription
    }
}

impl<T: Send + 'static> Observable<T> for ReceiverProducer<T> {
    fn subscribe<O: Observer<T>>(&self, mut observer: O) -> Subscription {
        let Some(rx) = lock(&self.rx).take() else {
            observer.on_error(Error::AlreadySubscribed);
            return Subscription::disposed();
        };

        let subscription = Subscription::new();
        let state = subscription.state();

        thread::spawn(move || loop {
            if state.is_disposed() {
                log::trace!("receiver producer disposed");
                return;
            }
            match rx.recv_timeout(RECEIVER_POOLING_INTERVAL) {
                Ok(value) => observer.on_next(value),
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    observer.on_completed();
                    return;
                }
            }
        });

        subscription
    }
}

impl<T> Debug for ReceiverProducer<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiverProducer")
            .field("subscribed", &lock(&self.rx).is_none())
            .finish()
    }
}
