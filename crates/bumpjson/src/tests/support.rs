use alloc::rc::Rc;
use core::{alloc::Layout, cell::Cell, ptr::NonNull};

use crate::allocator::{Allocator, SystemAllocator};

/// Allocation and free counts shared between a [`CountingAllocator`] and the
/// test that handed it to a pool.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    allocations: Cell<usize>,
    frees: Cell<usize>,
    refused: Cell<usize>,
}

impl Counters {
    pub(crate) fn allocations(&self) -> usize {
        self.allocations.get()
    }

    pub(crate) fn frees(&self) -> usize {
        self.frees.get()
    }

    pub(crate) fn refused(&self) -> usize {
        self.refused.get()
    }

    pub(crate) fn live(&self) -> usize {
        self.allocations() - self.frees()
    }
}

/// [`SystemAllocator`] that counts calls and can refuse after a budget of
/// successful allocations.
#[derive(Debug)]
pub(crate) struct CountingAllocator {
    counters: Rc<Counters>,
    budget: Option<usize>,
}

impl CountingAllocator {
    pub(crate) fn new() -> Self {
        Self {
            counters: Rc::default(),
            budget: None,
        }
    }

    pub(crate) fn with_budget(budget: usize) -> Self {
        Self {
            budget: Some(budget),
            ..Self::new()
        }
    }

    pub(crate) fn counters(&self) -> Rc<Counters> {
        Rc::clone(&self.counters)
    }
}

impl Allocator for CountingAllocator {
    fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        if self
            .budget
            .is_some_and(|budget| self.counters.allocations() >= budget)
        {
            self.counters.refused.set(self.counters.refused() + 1);
            return None;
        }
        let ptr = SystemAllocator.allocate(layout)?;
        self.counters.allocations.set(self.counters.allocations() + 1);
        Some(ptr)
    }

    unsafe fn free(&mut self, ptr: NonNull<u8>, layout: Layout) {
        self.counters.frees.set(self.counters.frees() + 1);
        // SAFETY: forwarded from the caller.
        unsafe { SystemAllocator.free(ptr, layout) }
    }
}
