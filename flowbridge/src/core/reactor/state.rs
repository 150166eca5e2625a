use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of a reactor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum ReactorState {
    /// Reactor is constructed and registered, but the call is not started.
    Initializing = 0,
    /// Call is started, reads and writes are processed.
    Active = 1,
    /// Terminal event is being delivered.
    Terminating = 2,
    /// Subscription is released and slot is reclaimed.
    Destroyed = 3,
}

impl ReactorState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ReactorState::Initializing,
            1 => ReactorState::Active,
            2 => ReactorState::Terminating,
            _ => ReactorState::Destroyed,
        }
    }

    /// Returns `true` once a terminal path has been entered.
    pub fn is_terminal(&self) -> bool {
        *self >= ReactorState::Terminating
    }
}

/// Atomic cell with reactor state.
///
/// Transitions only move forward. The transition into [`ReactorState::Terminating`] succeeds for
/// exactly one caller.
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(ReactorState::Initializing as u8))
    }

    pub(crate) fn get(&self) -> ReactorState {
        ReactorState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Moves from [`ReactorState::Initializing`] to [`ReactorState::Active`].
    pub(crate) fn activate(&self) -> bool {
        self.0
            .compare_exchange(
                ReactorState::Initializing as u8,
                ReactorState::Active as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Enters [`ReactorState::Terminating`].
    ///
    /// Returns `false` if some other caller has already entered a terminal path.
    pub(crate) fn begin_terminating(&self) -> bool {
        let mut current = self.0.load(Ordering::Acquire);
        loop {
            if ReactorState::from_u8(current).is_terminal() {
                return false;
            }
            match self.0.compare_exchange_weak(
                current,
                ReactorState::Terminating as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    pub(crate) fn destroy(&self) {
        self.0.store(ReactorState::Destroyed as u8, Ordering::Release);
    }
}
