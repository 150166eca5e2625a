use std::sync::mpsc;
use std::time::Duration;

use crate::core::rx::{Notification, Observer};
use crate::errors::{
    RecvError, RecvResult, RecvTimeoutError, RecvTimeoutResult, TryRecvError, TryRecvResult,
};

use crate::prelude::*;

/// <sup>[`sync`](crate::sync)</sup>
/// Creates a sink connected to a blocking receiver.
///
/// Every notification delivered to [`NotificationSender`] becomes available through
/// [`NotificationReceiver`]. The receiver is disconnected once it has returned a terminal
/// notification.
pub fn channel<T: Send + 'static>() -> (NotificationSender<T>, NotificationReceiver<T>) {
    let (tx, rx) = mpsc::channel();
    (
        NotificationSender { tx },
        NotificationReceiver {
            rx,
            terminated: false,
        },
    )
}

/// <sup>[`sync`](crate::sync)</sup>
/// Sink which forwards notifications into a [`NotificationReceiver`].
#[derive(Clone, Debug)]
pub struct NotificationSender<T> {
    tx: mpsc::Sender<Notification<T>>,
}

/// <sup>[`sync`](crate::sync)</sup>
/// Blocking receiver of notifications.
#[derive(Debug)]
pub struct NotificationReceiver<T> {
    rx: mpsc::Receiver<Notification<T>>,
    terminated: bool,
}

/// <sup>[`sync`](crate::sync)</sup>
/// Blocking iterator over notifications.
///
/// Yields the terminal notification and stops.
#[derive(Debug)]
pub struct NotificationIter<'a, T> {
    receiver: &'a mut NotificationReceiver<T>,
}

impl<T: Send + 'static> NotificationSender<T> {
    fn send(&self, notification: Notification<T>) {
        if self.tx.send(notification).is_err() {
            log::trace!("notification receiver is gone");
        }
    }
}

impl<T: Send + 'static> Observer<T> for NotificationSender<T> {
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

impl<T> NotificationReceiver<T> {
    /// Blocks until the next notification.
    pub fn recv(&mut self) -> RecvResult<Notification<T>> {
        if self.terminated {
            return Err(RecvError);
        }
        let notification = self.rx.recv()?;
        Ok(self.track(notification))
    }

    /// Blocks until the next notification or until `timeout` is reached.
    pub fn recv_timeout(&mut self, timeout: Duration) -> RecvTimeoutResult<Notification<T>> {
        if self.terminated {
            return Err(RecvTimeoutError::Disconnected);
        }
        let notification = self.rx.recv_timeout(timeout)?;
        Ok(self.track(notification))
    }

    /// Returns the next notification if it is available.
    pub fn try_recv(&mut self) -> TryRecvResult<Notification<T>> {
        if self.terminated {
            return Err(TryRecvError::Disconnected);
        }
        let notification = self.rx.try_recv()?;
        Ok(self.track(notification))
    }

    /// Returns `true` once the terminal notification has been received.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Blocking iterator over the remaining notifications.
    pub fn iter(&mut self) -> NotificationIter<'_, T> {
        NotificationIter { receiver: self }
    }

    /// Blocks until the terminal notification and collects values.
    ///
    /// Returns the error if the stream has failed. If all senders are dropped before a terminal
    /// notification, returns values received so far.
    pub fn wait_all(mut self) -> Result<Vec<T>> {
        let mut values = Vec::new();
        for notification in self.iter() {
            match notification {
                Notification::Next(value) => values.push(value),
                Notification::Error(err) => return Err(err),
                Notification::Completed => break,
            }
        }
        Ok(values)
    }

    fn track(&mut self, notification: Notification<T>) -> Notification<T> {
        if notification.is_terminal() {
            self.terminated = true;
        }
        notification
    }
}

impl<'a, T> Iterator for NotificationIter<'a, T> {
    type Item = Notification<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.receiver.recv().ok()
    }
}
