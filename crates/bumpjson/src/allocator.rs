//! The memory provider behind every arena region.
//!
//! The parser never allocates tree memory from the global heap directly.
//! Instead it asks an [`Allocator`] for large regions and carves those up
//! itself (see [`crate::arena`]). Callers that need accounting, a fixed
//! budget, or a custom heap supply their own implementation.

use alloc::alloc as heap;
use core::{alloc::Layout, ptr::NonNull};

/// Alignment every arena region and every arena allocation is rounded to.
///
/// Matches `alignof(max_align_t)` on the mainstream 64-bit targets.
pub const MAX_ALIGN: usize = 16;

/// Source of raw memory regions for the arena pool.
///
/// Memory returned by [`allocate`](Allocator::allocate) carries no
/// zero-initialization guarantee. Successive calls must return disjoint
/// regions that stay valid until passed back to [`free`](Allocator::free).
pub trait Allocator {
    /// Returns a region satisfying `layout`, or `None` when no memory is
    /// available. Failure is reported to the parser as an out-of-memory
    /// error, never as a panic.
    fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>>;

    /// Releases a region previously obtained from this allocator.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by [`allocate`](Allocator::allocate) on
    /// this allocator with the same `layout`, and must not have been freed
    /// already.
    unsafe fn free(&mut self, ptr: NonNull<u8>, layout: Layout);
}

impl<A: Allocator + ?Sized> Allocator for &mut A {
    #[inline]
    fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn free(&mut self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded verbatim; the caller upholds the contract.
        unsafe { (**self).free(ptr, layout) }
    }
}

/// [`Allocator`] backed by the global Rust allocator.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl Allocator for SystemAllocator {
    fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return None;
        }
        // SAFETY: `layout` has a non-zero size.
        NonNull::new(unsafe { heap::alloc(layout) })
    }

    unsafe fn free(&mut self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: the caller guarantees `ptr` came from `allocate` with
        // `layout`, which forwards to the global allocator.
        unsafe { heap::dealloc(ptr.as_ptr(), layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_allocator_round_trip() {
        let mut allocator = SystemAllocator;
        let layout = Layout::from_size_align(64, MAX_ALIGN).unwrap();
        let ptr = allocator.allocate(layout).expect("allocation succeeds");
        assert_eq!(ptr.as_ptr() as usize % MAX_ALIGN, 0);
        unsafe { allocator.free(ptr, layout) };
    }

    #[test]
    fn zero_sized_request_is_refused() {
        let mut allocator = SystemAllocator;
        let layout = Layout::from_size_align(0, MAX_ALIGN).unwrap();
        assert!(allocator.allocate(layout).is_none());
    }
}
