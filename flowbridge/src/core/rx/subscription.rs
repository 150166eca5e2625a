//! # Disposable subscriptions
//!
//! A [`Subscription`] links an observer to a producer. There are two levels of access to the
//! subscription state:
//!
//! * [`Subscription`] can be cloned and disposed by any of its owners. Disposal is idempotent:
//!   the first call runs registered teardown actions, subsequent calls do nothing.
//! * [`SubscriptionState`] is a read-only view used by producers to check whether they should keep
//!   emitting.
//!
//! Disposal never waits for a producer. A producer that is in the middle of an emission when the
//! subscription is disposed may still complete that emission, but it will observe the disposed
//! state before the next one.

use std::fmt::{Debug, Formatter};
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::core::utils::lock;

type Teardown = Box<dyn FnOnce() + Send + 'static>;

/// Disposable handle of a subscription.
///
/// # Usage
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use flowbridge::core::rx::Subscription;
///
/// let subscription = Subscription::new();
/// let state = subscription.state();
/// let counter = Arc::new(AtomicUsize::new(0));
///
/// {
///     let counter = counter.clone();
///     subscription.add_teardown(move || {
///         counter.fetch_add(1, Ordering::SeqCst);
///     });
/// }
///
/// subscription.dispose();
/// subscription.dispose();
///
/// assert!(state.is_disposed());
/// assert_eq!(counter.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
#[must_use]
pub struct Subscription {
    inner: Arc<SubscriptionInner>,
}

/// Read-only access to a state of a [`Subscription`].
#[derive(Clone, Debug)]
pub struct SubscriptionState(Arc<SubscriptionInner>);

struct SubscriptionInner {
    disposed: AtomicBool,
    teardown: Mutex<Vec<Teardown>>,
}

impl Subscription {
    /// Creates an active subscription.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SubscriptionInner {
                disposed: AtomicBool::new(false),
                teardown: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Creates a subscription which is already disposed.
    ///
    /// Producers that terminate synchronously during subscription return such handles.
    pub fn disposed() -> Self {
        let subscription = Self::new();
        subscription.dispose();
        subscription
    }

    /// Registers an action which will be executed upon disposal.
    ///
    /// If subscription is already disposed, the action is executed immediately.
    pub fn add_teardown<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut teardown = lock(&self.inner.teardown);
            if !self.is_disposed() {
                teardown.push(Box::new(action));
                return;
            }
        }
        action();
    }

    /// Disposes the subscription.
    ///
    /// Only the first call executes teardown actions. Actions are executed on the calling thread
    /// in the order they were registered.
    pub fn dispose(&self) {
        let actions = {
            let mut teardown = lock(&self.inner.teardown);
            if self.inner.disposed.swap(true, Ordering::AcqRel) {
                return;
            }
            mem::take(&mut *teardown)
        };

        for action in actions {
            action();
        }
    }

    /// Returns `true` if subscription is disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    /// Returns a read-only view of the subscription state.
    pub fn state(&self) -> SubscriptionState {
        SubscriptionState(self.inner.clone())
    }
}

impl SubscriptionState {
    /// Returns `true` if subscription is disposed.
    pub fn is_disposed(&self) -> bool {
        self.0.disposed.load(Ordering::Acquire)
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

impl Debug for SubscriptionInner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionInner")
            .field("disposed", &self.disposed.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod subscription_tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let counter = Arc::new(AtomicUsize::new(0));
        let action = {
            let counter = counter.clone();
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        };
        (counter, action)
    }

    #[test]
    fn subscription_state_is_passing() {
        let subscription = Subscription::new();
        let state_1 = subscription.state();
        let state_2 = subscription.clone().state();

        assert!(!state_1.is_disposed());
        assert!(!state_2.is_disposed());

        subscription.dispose();

        assert!(subscription.is_disposed());
        assert!(state_1.is_disposed());
        assert!(state_2.is_disposed());
    }

    #[test]
    fn teardown_runs_once() {
        let subscription = Subscription::new();
        let (counter, action) = counter();
        subscription.add_teardown(action);

        let clone = subscription.clone();
        clone.dispose();
        subscription.dispose();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn teardown_after_disposal_runs_immediately() {
        let subscription = Subscription::disposed();
        let (counter, action) = counter();

        subscription.add_teardown(action);

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_does_not_dispose() {
        let subscription = Subscription::new();
        let state = subscription.state();

        drop(subscription);

        assert!(!state.is_disposed());
    }

    #[test]
    fn concurrent_disposal_runs_teardown_once() {
        let subscription = Subscription::new();
        let (counter, action) = counter();
        subscription.add_teardown(action);

        let handlers: Vec<_> = (0..16)
            .map(|_| {
                let subscription = subscription.clone();
                thread::spawn(move || subscription.dispose())
            })
            .collect();
        for handler in handlers {
            handler.join().unwrap();
        }

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
