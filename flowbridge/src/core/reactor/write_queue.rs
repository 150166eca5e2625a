use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::core::utils::lock;

use crate::prelude::*;

/// Reason why outbound direction is closed.
#[derive(Clone, Debug)]
pub(crate) enum WritesEnd {
    /// Producer completed.
    Completed,
    /// Producer failed.
    Failed(Error),
    /// Subscription was disposed from outside.
    Cancelled,
}

/// Result of [`WriteQueue::enqueue`].
#[derive(Debug)]
pub(crate) enum Enqueued<T> {
    /// Queue was empty, the caller has to start a write of this message.
    Write(Arc<T>),
    /// Message waits behind an in-flight write.
    Queued(usize),
    /// Queue no longer accepts messages.
    Dropped,
}

/// Result of [`WriteQueue::confirm`].
#[derive(Debug)]
pub(crate) enum Confirmed<T> {
    /// The caller has to start a write of the next message.
    Write(Arc<T>),
    /// Queue is drained and outbound direction has to be closed.
    Close(WritesEnd),
    /// Nothing to do.
    Idle,
}

/// Outbound FIFO with at most one write in flight.
///
/// The front element is the message being written. It stays in the queue until the transport
/// confirms the write. A write is requested only when an element becomes the front: either it was
/// enqueued into an empty queue, or the previous front was confirmed.
///
/// Closing is deferred until the queue drains. Once closing is requested, the queue rejects new
/// messages.
///
/// The queue never calls the transport itself. Methods return what the caller has to request, so
/// the internal lock is never held across a transport call.
#[derive(Debug)]
pub(crate) struct WriteQueue<T> {
    state: Mutex<QueueState<T>>,
}

#[derive(Debug)]
struct QueueState<T> {
    pending: VecDeque<Arc<T>>,
    closed: bool,
    close: Option<WritesEnd>,
}

impl<T> WriteQueue<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                pending: VecDeque::new(),
                closed: false,
                close: None,
            }),
        }
    }

    pub(crate) fn enqueue(&self, message: T) -> Enqueued<T> {
        let mut state = lock(&self.state);
        if state.closed {
            return Enqueued::Dropped;
        }

        let message = Arc::new(message);
        state.pending.push_back(message.clone());

        match state.pending.len() {
            1 => Enqueued::Write(message),
            len => Enqueued::Queued(len - 1),
        }
    }

    pub(crate) fn confirm(&self) -> Confirmed<T> {
        let mut state = lock(&self.state);
        state.pending.pop_front();

        if let Some(front) = state.pending.front() {
            return Confirmed::Write(front.clone());
        }
        match state.close.take() {
            Some(end) => Confirmed::Close(end),
            None => Confirmed::Idle,
        }
    }

    /// Requests closing of the outbound direction.
    ///
    /// Returns the reason if the caller has to close the direction right away. Returns [`None`] if
    /// closing is deferred until the in-flight writes are confirmed, or if closing was already
    /// requested.
    pub(crate) fn close(&self, end: WritesEnd) -> Option<WritesEnd> {
        let mut state = lock(&self.state);
        if state.closed {
            return None;
        }
        state.closed = true;

        if state.pending.is_empty() {
            Some(end)
        } else {
            state.close = Some(end);
            None
        }
    }

    /// Drops pending messages and rejects all subsequent requests if `begin` returns `true`.
    ///
    /// `begin` runs under the queue lock, so no enqueue observes an open queue after it succeeds.
    /// Returns the number of dropped messages, or [`None`] if `begin` refused.
    pub(crate) fn shutdown_if(&self, begin: impl FnOnce() -> bool) -> Option<usize> {
        let mut state = lock(&self.state);
        if !begin() {
            return None;
        }
        state.closed = true;
        state.close = None;
        let dropped = state.pending.len();
        state.pending.clear();
        Some(dropped)
    }
}

#[cfg(test)]
mod write_queue_tests {
    use super::*;

    fn write<T: Clone + std::fmt::Debug>(result: Enqueued<T>) -> T {
        match result {
            Enqueued::Write(message) => (*message).clone(),
            other => panic!("expected a write, got {other:?}"),
        }
    }

    #[test]
    fn only_front_is_written() {
        let queue = WriteQueue::new();

        assert_eq!(write(queue.enqueue(10)), 10);
        assert!(matches!(queue.enqueue(3), Enqueued::Queued(1)));
        assert!(matches!(queue.enqueue(15), Enqueued::Queued(2)));

        assert!(matches!(queue.confirm(), Confirmed::Write(m) if *m == 3));
        assert!(matches!(queue.confirm(), Confirmed::Write(m) if *m == 15));
        assert!(matches!(queue.confirm(), Confirmed::Idle));

        assert_eq!(write(queue.enqueue(20)), 20);
    }

    #[test]
    fn closing_waits_for_drain() {
        let queue = WriteQueue::new();
        write(queue.enqueue(1));
        queue.enqueue(2);

        assert!(queue.close(WritesEnd::Completed).is_none());
        assert!(matches!(queue.enqueue(3), Enqueued::Dropped));

        assert!(matches!(queue.confirm(), Confirmed::Write(m) if *m == 2));
        assert!(matches!(queue.confirm(), Confirmed::Close(WritesEnd::Completed)));
        assert!(matches!(queue.confirm(), Confirmed::Idle));
    }

    #[test]
    fn closing_empty_queue_is_immediate_and_once() {
        let queue = WriteQueue::<u32>::new();

        assert!(matches!(
            queue.close(WritesEnd::Failed(Error::Producer("boom".into()))),
            Some(WritesEnd::Failed(_))
        ));
        assert!(queue.close(WritesEnd::Cancelled).is_none());
        assert!(matches!(queue.enqueue(1), Enqueued::Dropped));
    }

    #[test]
    fn shutdown_discards_deferred_close() {
        let queue = WriteQueue::new();
        write(queue.enqueue(1));
        queue.close(WritesEnd::Completed);

        assert_eq!(queue.shutdown_if(|| true), Some(1));
        assert!(matches!(queue.confirm(), Confirmed::Idle));
        assert!(matches!(queue.enqueue(2), Enqueued::Dropped));
    }

    #[test]
    fn refused_shutdown_keeps_queue_open() {
        let queue = WriteQueue::new();
        write(queue.enqueue(1));

        assert_eq!(queue.shutdown_if(|| false), None);
        assert!(matches!(queue.enqueue(2), Enqueued::Queued(1)));
        assert!(matches!(queue.confirm(), Confirmed::Write(m) if *m == 2));
    }
}
