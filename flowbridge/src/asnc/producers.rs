use std::fmt::{Debug, Display, Formatter};
use std::sync::Mutex;

use tokio::runtime::Handle;
use tokio_stream::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::core::rx::{Observable, Observer, Subscription};
use crate::core::utils::lock;

use crate::prelude::*;

/// <sup>[`async`](crate::asnc)</sup>
/// Creates a producer which emits items of a stream.
///
/// The producer supports a single subscription. Items are pulled by a Tokio task spawned on the
/// current runtime. Disposal of the subscription cancels the task.
pub fn from_stream<S>(stream: S) -> StreamProducer<S>
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
{
    StreamProducer {
        stream: Mutex::new(Some(stream)),
    }
}

/// <sup>[`async`](crate::asnc)</sup>
/// Creates a producer which emits successful items of a stream.
///
/// The first error fails the producer with [`Error::Producer`].
pub fn from_try_stream<S, T, E>(stream: S) -> TryStreamProducer<S>
where
    S: Stream<Item = core::result::Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    TryStreamProducer {
        inner: from_stream(stream),
    }
}

/// <sup>[`async`](crate::asnc)</sup>
/// Producer created by [`from_stream`].
pub struct StreamProducer<S> {
    stream: Mutex<Option<S>>,
}

/// <sup>[`async`](crate::asnc)</sup>
/// Producer created by [`from_try_stream`].
#[derive(Debug)]
pub struct TryStreamProducer<S> {
    inner: StreamProducer<S>,
}

impl<S> Observable<S::Item> for StreamProducer<S>
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
{
    fn subscribe<O: Observer<S::Item>>(&self, mut observer: O) -> Subscription {
        let Ok(runtime) = Handle::try_current() else {
            observer.on_error(Error::NoRuntime);
            return Subscription::disposed();
        };
        let Some(stream) = lock(&self.stream).take() else {
            observer.on_error(Error::AlreadySubscribed);
            return Subscription::disposed();
        };

        let token = CancellationToken::new();
        let subscription = Subscription::new();
        {
            let token = token.clone();
            subscription.add_teardown(move || token.cancel());
        }

        runtime.spawn(async move {
            tokio::pin!(stream);
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        log::trace!("stream producer cancelled");
                        return;
                    }
                    item = stream.next() => match item {
                        Some(item) => observer.on_next(item),
                        None => {
                            observer.on_completed();
                            return;
                        }
                    }
                }
            }
        });

        subscription
    }
}

impl<S, T, E> Observable<T> for TryStreamProducer<S>
where
    S: Stream<Item = core::result::Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    fn subscribe<O: Observer<T>>(&self, observer: O) -> Subscription {
        self.inner.subscribe(TryObserver {
            observer: Some(observer),
        })
    }
}

/// Unwraps results and fails on the first error.
struct TryObserver<O> {
    observer: Option<O>,
}

impl<T, E, O> Observer<core::result::Result<T, E>> for TryObserver<O>
where
    T: Send + 'static,
    E: Display + Send + 'static,
    O: Observer<T>,
{
    fn on_next(&mut self, value: core::result::Result<T, E>) {
        match value {
            Ok(value) => {
                if let Some(observer) = self.observer.as_mut() {
                    observer.on_next(value);
                }
            }
            Err(err) => <Self as Observer<core::result::Result<T, E>>>::on_error(self, Error::Producer(err.to_string())),
        }
    }

    fn on_error(&mut self, error: Error) {
        if let Some(mut observer) = self.observer.take() {
            observer.on_error(error);
        }
    }

    fn on_completed(&mut self) {
        if let Some(mut observer) = self.observer.take() {
            observer.on_completed();
        }
    }
}

impl<S> Debug for StreamProducer<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamProducer")
            .field("subscribed", &lock(&self.stream).is_none())
            .finish()
    }
}
