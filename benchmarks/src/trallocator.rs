//! Tracking allocator.
//!
//! Wraps another allocator and counts bytes which are currently allocated.

use std::alloc::{GlobalAlloc, Layout};
use std::sync::atomic::{AtomicU64, Ordering};

/// Allocator which tracks the amount of allocated memory.
pub struct Trallocator<A: GlobalAlloc> {
    inner: A,
    allocated: AtomicU64,
}

unsafe impl<A: GlobalAlloc> GlobalAlloc for Trallocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.allocated
            .fetch_add(layout.size() as u64, Ordering::SeqCst);
        self.inner.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.inner.dealloc(ptr, layout);
        self.allocated
            .fetch_sub(layout.size() as u64, Ordering::SeqCst);
    }
}

impl<A: GlobalAlloc> Trallocator<A> {
    /// Wraps an allocator.
    pub const fn new(inner: A) -> Self {
        Trallocator {
            inner,
            allocated: AtomicU64::new(0),
        }
    }

    /// Resets the counter.
    pub fn reset(&self) {
        self.allocated.store(0, Ordering::SeqCst);
    }

    /// Bytes allocated since the last reset.
    pub fn get(&self) -> u64 {
        self.allocated.load(Ordering::SeqCst)
    }
}
