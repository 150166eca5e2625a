use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, Weak};

use crate::core::rx::{Observable, Observer, Subscription, SubscriptionState};
use crate::core::utils::lock;

use crate::prelude::*;

type SharedObserver<T> = Arc<Mutex<Box<dyn Observer<T>>>>;

/// Hot multicast producer.
///
/// Every value pushed into a [`Subject`] is delivered to all observers subscribed at that moment.
/// Values can be pushed from any thread either directly ([`Subject::next`], [`Subject::error`],
/// [`Subject::complete`]) or through a [`SubjectObserver`] obtained by [`Subject::observer`].
///
/// Once subject is terminated, late subscribers receive the terminal event immediately and get an
/// already disposed [`Subscription`].
///
/// # Usage
///
/// ```rust
/// use std::sync::mpsc;
/// use flowbridge::core::rx::{FnObserver, Observable, Subject};
///
/// let subject = Subject::<u32>::new();
/// let (tx, rx) = mpsc::channel();
///
/// let subscription = subject.subscribe(FnObserver::new(move |value: u32| tx.send(value).unwrap()));
///
/// subject.next(1);
/// subscription.dispose();
/// subject.next(2);
///
/// assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![1]);
/// ```
pub struct Subject<T> {
    inner: Arc<SubjectInner<T>>,
}

/// Observer which feeds a [`Subject`].
///
/// Can be cloned and passed to other threads.
pub struct SubjectObserver<T> {
    inner: Arc<SubjectInner<T>>,
}

struct SubjectInner<T> {
    state: Mutex<SubjectState<T>>,
}

struct SubjectState<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
    terminal: Option<Terminal>,
}

struct Entry<T> {
    id: u64,
    observer: SharedObserver<T>,
    state: SubscriptionState,
}

#[derive(Clone)]
enum Terminal {
    Error(Error),
    Completed,
}

impl<T: Clone + Send + 'static> Subject<T> {
    /// Creates a new subject without subscribers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SubjectInner {
                state: Mutex::new(SubjectState {
                    next_id: 0,
                    entries: Vec::new(),
                    terminal: None,
                }),
            }),
        }
    }

    /// Returns an observer that feeds this subject.
    pub fn observer(&self) -> SubjectObserver<T> {
        SubjectObserver {
            inner: self.inner.clone(),
        }
    }

    /// Pushes the next value to all subscribers.
    pub fn next(&self, value: T) {
        self.inner.next(value)
    }

    /// Terminates the subject with an error.
    pub fn error(&self, error: Error) {
        self.inner.terminate(Terminal::Error(error))
    }

    /// Completes the subject.
    pub fn complete(&self) {
        self.inner.terminate(Terminal::Completed)
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.state).entries.len()
    }

    /// Returns `true` if subject was terminated.
    pub fn is_terminated(&self) -> bool {
        lock(&self.inner.state).terminal.is_some()
    }
}

impl<T: Clone + Send + 'static> SubjectInner<T> {
    fn next(&self, value: T) {
        let observers: Vec<(SharedObserver<T>, SubscriptionState)> = {
            let state = lock(&self.state);
            if state.terminal.is_some() {
                return;
            }
            state
                .entries
                .iter()
                .map(|entry| (entry.observer.clone(), entry.state.clone()))
                .collect()
        };

        for (observer, state) in observers {
            if state.is_disposed() {
                continue;
            }
            lock(&observer).on_next(value.clone());
        }
    }

    fn terminate(&self, terminal: Terminal) {
        let entries = {
            let mut state = lock(&self.state);
            if state.terminal.is_some() {
                return;
            }
            state.terminal = Some(terminal.clone());
            std::mem::take(&mut state.entries)
        };

        for entry in entries {
            if entry.state.is_disposed() {
                continue;
            }
            let mut observer = lock(&entry.observer);
            match &terminal {
                Terminal::Error(err) => observer.on_error(err.clone()),
                Terminal::Completed => observer.on_completed(),
            }
        }
    }

    fn remove(&self, id: u64) {
        lock(&self.state).entries.retain(|entry| entry.id != id);
    }
}

impl<T: Clone + Send + 'static> Observable<T> for Subject<T> {
    fn subscribe<O: Observer<T>>(&self, observer: O) -> Subscription {
        let mut observer: Box<dyn Observer<T>> = Box::new(observer);

        let terminal = {
            let mut state = lock(&self.inner.state);
            if let Some(terminal) = state.terminal.clone() {
                terminal
            } else {
                let id = state.next_id;
                state.next_id += 1;

                let subscription = Subscription::new();
                state.entries.push(Entry {
                    id,
                    observer: Arc::new(Mutex::new(observer)),
                    state: subscription.state(),
                });

                let inner: Weak<SubjectInner<T>> = Arc::downgrade(&self.inner);
                subscription.add_teardown(move || {
                    if let Some(inner) = inner.upgrade() {
                        inner.remove(id);
                    }
                });
                return subscription;
            }
        };

        match terminal {
            Terminal::Error(err) => observer.on_error(err),
            Terminal::Completed => observer.on_completed(),
        }
        Subscription::disposed()
    }
}

impl<T: Clone + Send + 'static> Observer<T> for SubjectObserver<T> {
    fn on_next(&mut self, value: T) {
        self.inner.next(value)
    }

    fn on_error(&mut self, error: Error) {
        self.inner.terminate(Terminal::Error(error))
    }

    fn on_completed(&mut self) {
        self.inner.terminate(Terminal::Completed)
    }
}

impl<T: Clone + Send + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Clone for SubjectObserver<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Debug for Subject<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject").finish_non_exhaustive()
    }
}

impl<T> Debug for SubjectObserver<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubjectObserver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod subject_tests {
    use super::*;
    use crate::core::rx::{FnObserver, Notification};
    use std::sync::mpsc;

    fn recorder<T: Send + 'static>() -> (impl Observer<T>, mpsc::Receiver<Notification<T>>) {
        let (tx, rx) = mpsc::channel();
        let observer = {
            let (tx_err, tx_done) = (tx.clone(), tx.clone());
            FnObserver::new(move |value: T| tx.send(Notification::Next(value)).unwrap())
                .with_error(move |err| tx_err.send(Notification::Error(err)).unwrap())
                .with_completed(move || tx_done.send(Notification::Completed).unwrap())
        };
        (observer, rx)
    }

    #[test]
    fn values_are_multicast() {
        let subject = Subject::new();
        let (observer_1, rx_1) = recorder::<u32>();
        let (observer_2, rx_2) = recorder::<u32>();

        let _sub_1 = subject.subscribe(observer_1);
        let _sub_2 = subject.subscribe(observer_2);

        subject.next(10);
        subject.complete();

        for rx in [rx_1, rx_2] {
            let events: Vec<_> = rx.try_iter().collect();
            assert_eq!(events.len(), 2);
            assert!(matches!(events[0], Notification::Next(10)));
            assert!(matches!(events[1], Notification::Completed));
        }
        assert_eq!(subject.subscriber_count(), 0);
    }

    #[test]
    fn disposal_removes_subscriber() {
        let subject = Subject::new();
        let (observer, rx) = recorder::<u32>();

        let subscription = subject.subscribe(observer);
        assert_eq!(subject.subscriber_count(), 1);

        subscription.dispose();
        assert_eq!(subject.subscriber_count(), 0);

        subject.next(1);
        subject.complete();
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn late_subscribers_receive_terminal_event() {
        let subject = Subject::<u32>::new();
        subject.error(Error::Producer("boom".into()));

        let (observer, rx) = recorder::<u32>();
        let subscription = subject.subscribe(observer);

        assert!(subscription.is_disposed());
        assert!(matches!(rx.try_recv().unwrap(), Notification::Error(_)));
    }

    #[test]
    fn terminal_event_is_delivered_once() {
        let subject = Subject::<u32>::new();
        let (observer, rx) = recorder::<u32>();
        let _subscription = subject.subscribe(observer);

        let mut feeder = subject.observer();
        feeder.on_completed();
        feeder.on_error(Error::Producer("late".into()));
        feeder.on_next(1);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_terminal());
    }
}
