//! # Reactor registry
//!
//! Transports never own reactors. A reactor lives in a slot of a [`ReactorRegistry`] from the
//! moment a call is bound until its teardown. The transport refers to it through a
//! [`Completions`] handle, which carries a generational [`ReactorHandle`].
//!
//! When a reactor tears down, its slot is vacated and the slot generation is bumped. Completions
//! that arrive afterwards (or that carry a handle of a previous occupant of a reused slot) are
//! ignored.

use std::fmt::{Debug, Display, Formatter};
use std::sync::{Arc, Mutex, Weak};

use crate::core::status::Status;
use crate::core::transport::Reactor;
use crate::core::utils::{lock, Sealed};
use crate::errors::RegistryError;

use crate::prelude::*;

/// Generational handle of a reactor slot.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ReactorHandle {
    index: u32,
    generation: u32,
}

impl ReactorHandle {
    /// Slot index.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Slot generation.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl Debug for ReactorHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

impl Display for ReactorHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}

/// Slot table of active reactors.
///
/// Registry can be cloned, clones share the same table.
///
/// # Usage
///
/// ```rust
/// use flowbridge::core::registry::ReactorRegistry;
///
/// let registry = ReactorRegistry::bounded(16);
///
/// assert_eq!(registry.capacity(), Some(16));
/// assert!(registry.is_empty());
/// ```
#[derive(Clone, Default)]
pub struct ReactorRegistry {
    inner: Arc<RegistryInner>,
}

/// Completion handle passed to a transport when a call is bound.
///
/// Implements [`Reactor`] by forwarding each completion to the reactor which occupies the slot.
/// Completions for a vacated slot are ignored.
#[derive(Clone)]
pub struct Completions {
    registry: Arc<RegistryInner>,
    handle: ReactorHandle,
}

#[derive(Clone, Debug)]
pub(crate) struct WeakRegistry(Weak<RegistryInner>);

#[derive(Default)]
struct RegistryInner {
    slots: Mutex<Slots>,
}

#[derive(Default)]
struct Slots {
    entries: Vec<Slot>,
    free: Vec<u32>,
    occupied: usize,
    capacity: Option<usize>,
}

struct Slot {
    generation: u32,
    entry: Entry,
}

enum Entry {
    Vacant,
    Reserved,
    Occupied(Arc<dyn Reactor>),
}

impl ReactorRegistry {
    /// Creates an unbounded registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry which accepts at most `capacity` reactors at a time.
    pub fn bounded(capacity: usize) -> Self {
        let registry = Self::new();
        lock(&registry.inner.slots).capacity = Some(capacity);
        registry
    }

    /// Maximum number of simultaneously registered reactors.
    pub fn capacity(&self) -> Option<usize> {
        lock(&self.inner.slots).capacity
    }

    /// Number of registered reactors.
    pub fn len(&self) -> usize {
        lock(&self.inner.slots).occupied
    }

    /// Returns `true` if there are no registered reactors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if a reactor with the specified handle is still registered.
    pub fn contains(&self, handle: ReactorHandle) -> bool {
        let slots = lock(&self.inner.slots);
        slots
            .slot(handle)
            .is_some_and(|slot| !matches!(slot.entry, Entry::Vacant))
    }

    /// Reserves a slot for a reactor under construction.
    pub(crate) fn reserve(&self) -> Result<ReactorHandle> {
        let mut slots = lock(&self.inner.slots);

        if let Some(capacity) = slots.capacity {
            if slots.occupied >= capacity {
                return Err(RegistryError::Exhausted(capacity).into());
            }
        }
        slots.occupied += 1;

        if let Some(index) = slots.free.pop() {
            let slot = &mut slots.entries[index as usize];
            slot.entry = Entry::Reserved;
            return Ok(ReactorHandle {
                index,
                generation: slot.generation,
            });
        }

        let index = slots.entries.len() as u32;
        slots.entries.push(Slot {
            generation: 0,
            entry: Entry::Reserved,
        });
        Ok(ReactorHandle {
            index,
            generation: 0,
        })
    }

    /// Puts a constructed reactor into a reserved slot.
    pub(crate) fn activate(&self, handle: ReactorHandle, reactor: Arc<dyn Reactor>) -> Result<()> {
        let mut slots = lock(&self.inner.slots);
        match slots.slot_mut(handle) {
            Some(slot) if matches!(slot.entry, Entry::Reserved) => {
                slot.entry = Entry::Occupied(reactor);
                Ok(())
            }
            _ => Err(RegistryError::Vacant.into()),
        }
    }

    /// Vacates a slot.
    pub(crate) fn release(&self, handle: ReactorHandle) -> bool {
        self.inner.release(handle)
    }

    pub(crate) fn completions(&self, handle: ReactorHandle) -> Completions {
        Completions {
            registry: self.inner.clone(),
            handle,
        }
    }

    pub(crate) fn downgrade(&self) -> WeakRegistry {
        WeakRegistry(Arc::downgrade(&self.inner))
    }
}

impl RegistryInner {
    fn get(&self, handle: ReactorHandle) -> Option<Arc<dyn Reactor>> {
        let slots = lock(&self.slots);
        match slots.slot(handle).map(|slot| &slot.entry) {
            Some(Entry::Occupied(reactor)) => Some(reactor.clone()),
            _ => None,
        }
    }

    fn release(&self, handle: ReactorHandle) -> bool {
        // The reactor is dropped outside of the lock.
        let _entry = {
            let mut slots = lock(&self.slots);
            let entry = match slots.slot_mut(handle) {
                Some(slot) if !matches!(slot.entry, Entry::Vacant) => {
                    slot.generation = slot.generation.wrapping_add(1);
                    std::mem::replace(&mut slot.entry, Entry::Vacant)
                }
                _ => return false,
            };
            slots.occupied -= 1;
            slots.free.push(handle.index);
            entry
        };
        true
    }
}

impl Slots {
    fn slot(&self, handle: ReactorHandle) -> Option<&Slot> {
        self.entries
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
    }

    fn slot_mut(&mut self, handle: ReactorHandle) -> Option<&mut Slot> {
        self.entries
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
    }
}

impl WeakRegistry {
    pub(crate) fn release(&self, handle: ReactorHandle) -> bool {
        match self.0.upgrade() {
            Some(inner) => inner.release(handle),
            None => false,
        }
    }
}

impl Completions {
    /// Handle of the reactor slot.
    pub fn handle(&self) -> ReactorHandle {
        self.handle
    }

    fn reactor(&self, event: &str) -> Option<Arc<dyn Reactor>> {
        let reactor = self.registry.get(self.handle);
        if reactor.is_none() {
            log::trace!("[{:?}] ignoring stale completion: {event}", self.handle);
        }
        reactor
    }
}

impl Sealed for Completions {}

impl Reactor for Completions {
    fn on_read_done(&self, ok: bool) {
        if let Some(reactor) = self.reactor("read") {
            reactor.on_read_done(ok)
        }
    }

    fn on_write_done(&self, ok: bool) {
        if let Some(reactor) = self.reactor("write") {
            reactor.on_write_done(ok)
        }
    }

    fn on_done(&self, status: Status) {
        if let Some(reactor) = self.reactor("done") {
            reactor.on_done(status)
        }
    }
}

impl Debug for ReactorRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let slots = lock(&self.inner.slots);
        f.debug_struct("ReactorRegistry")
            .field("occupied", &slots.occupied)
            .field("slots", &slots.entries.len())
            .field("capacity", &slots.capacity)
            .finish()
    }
}

impl Debug for Completions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completions")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}
