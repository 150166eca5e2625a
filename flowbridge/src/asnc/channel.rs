use std::fmt::{Debug, Formatter};
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use async_stream::stream;
use tokio::sync::mpsc;
use tokio_stream::{Stream, StreamExt};
use tokio_util::sync::ReusableBoxFuture;

use crate::core::rx::{Notification, Observer};

use crate::prelude::*;

type Receiver<T> = mpsc::UnboundedReceiver<Notification<T>>;

/// <sup>[`async`](crate::asnc)</sup>
/// Creates a sink connected to an asynchronous stream of notifications.
///
/// The stream ends after it has yielded a terminal notification, or when all senders are dropped.
pub fn channel<T: Send + 'static>() -> (StreamSender<T>, NotificationStream<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (StreamSender { tx }, NotificationStream::new(rx))
}

/// <sup>[`async`](crate::asnc)</sup>
/// Sink which forwards notifications into a [`NotificationStream`].
///
/// Never blocks, so it can be used from transport threads as well as from Tokio tasks.
#[derive(Clone, Debug)]
pub struct StreamSender<T> {
    tx: mpsc::UnboundedSender<Notification<T>>,
}

/// <sup>[`async`](crate::asnc)</sup>
/// Stream of notifications.
pub struct NotificationStream<T: Send + 'static> {
    inner: ReusableBoxFuture<'static, (Option<Notification<T>>, Receiver<T>)>,
    terminated: bool,
}

impl<T: Send + 'static> StreamSender<T> {
    fn send(&self, notification: Notification<T>) {
        if self.tx.send(notification).is_err() {
            log::trace!("notification stream is gone");
        }
    }
}

impl<T: Send + 'static> Observer<T> for StreamSender<T> {
    fn on_next(&mut self, value: T) {
        self.send(Notification::Next(value))
    }

    fn on_error(&mut self, error: Error) {
        self.send(Notification::Error(error))
    }

    fn on_completed(&mut self) {
        self.send(Notification::Completed)
    }
}

impl<T: Send + 'static> NotificationStream<T> {
    fn new(rx: Receiver<T>) -> Self {
        Self {
            inner: ReusableBoxFuture::new(make_future(rx)),
            terminated: false,
        }
    }

    /// Converts notifications into a stream of values.
    ///
    /// A terminal error becomes the last item.
    pub fn into_values(self) -> impl Stream<Item = Result<T>> {
        stream! {
            let mut notifications = self;
            while let Some(notification) = notifications.next().await {
                match notification {
                    Notification::Next(value) => {
                        yield Ok(value);
                    }
                    Notification::Error(err) => {
                        yield Err(err);
                    }
                    Notification::Completed => {}
                }
            }
        }
    }

    /// Waits for the terminal notification and collects values.
    ///
    /// Returns the error if the stream has failed.
    pub async fn collect_values(self) -> Result<Vec<T>> {
        let values = self.into_values();
        tokio::pin!(values);

        let mut collected = Vec::new();
        while let Some(value) = values.next().await {
            collected.push(value?);
        }
        Ok(collected)
    }
}

async fn make_future<T: Send + 'static>(
    mut rx: Receiver<T>,
) -> (Option<Notification<T>>, Receiver<T>) {
    let notification = rx.recv().await;
    (notification, rx)
}

impl<T: Send + 'static> Stream for NotificationStream<T> {
    type Item = Notification<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.terminated {
            return Poll::Ready(None);
        }

        let (notification, rx) = ready!(self.inner.poll(cx));
        self.inner.set(make_future(rx));

        if let Some(notification) = &notification {
            if notification.is_terminal() {
                self.terminated = true;
            }
        }
        Poll::Ready(notification)
    }
}

impl<T: Send + 'static> Debug for NotificationStream<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationStream")
            .field("terminated", &self.terminated)
            .finish_non_exhaustive()
    }
}
