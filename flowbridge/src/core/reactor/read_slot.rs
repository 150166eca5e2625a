use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex};

use crate::core::utils::lock;

/// Buffer for the next inbound message.
///
/// A reactor hands a clone of its slot to [`StreamReader::start_read`] each time it arms a read.
/// The transport stores the received message with [`ReadSlot::fill`] and reports a successful
/// read. The reactor then takes the message out and re-arms the read with the same slot.
///
/// For client-streaming calls the slot is handed to the transport method once, at bind time, and
/// is expected to hold the final response when the call finishes successfully.
///
/// [`StreamReader::start_read`]: crate::core::transport::StreamReader::start_read
pub struct ReadSlot<T> {
    inner: Arc<Mutex<Option<T>>>,
}

impl<T> ReadSlot<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }

    /// Stores an inbound message.
    ///
    /// Replaces a message which was not taken by a reactor.
    pub fn fill(&self, value: T) {
        *lock(&self.inner) = Some(value);
    }

    /// Returns `true` if slot holds a message.
    pub fn is_filled(&self) -> bool {
        lock(&self.inner).is_some()
    }

    pub(crate) fn take(&self) -> Option<T> {
        lock(&self.inner).take()
    }
}

impl<T> Clone for ReadSlot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Debug for ReadSlot<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadSlot")
            .field("filled", &self.is_filled())
            .finish()
    }
}
