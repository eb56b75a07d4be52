//! Bump allocation over a growable pool of regions.
//!
//! Every byte of a parsed tree lives in an [`ArenaPool`]: string payloads,
//! array elements, object keys and values. Regions are obtained from the
//! pool's [`Allocator`] and handed out from their high end downwards, so an
//! address returned once never moves. Nothing is released individually;
//! [`ArenaPool::rewind`] and [`ArenaPool::release_all`] need exclusive access,
//! which is what keeps the shared-reference allocation API sound.
//!
//! The pool keeps no index of its own on the heap. Each region starts with a
//! [`Header`] holding its layout, its free-space top and a link to the next
//! region, so the allocator is the only source of memory.
//!
//! ```text
//!   region:  [header][ ................ end)
//!   alloc:   [header][ ....... end')[ new )[ older )
//! ```

use core::{
    alloc::Layout,
    cell::RefCell,
    fmt,
    mem::{self, MaybeUninit},
    ptr::{self, NonNull},
    slice,
};

use crate::allocator::{Allocator, MAX_ALIGN};

/// Size of a region when the request fits comfortably.
pub(crate) const DEFAULT_REGION_SIZE: usize = 1024;

/// Bytes reserved at the base of every region for its [`Header`].
const HEADER_SIZE: usize = mem::size_of::<Header>().next_multiple_of(MAX_ALIGN);

const _: () = assert!(mem::align_of::<Header>() <= MAX_ALIGN);

/// The pool could not obtain memory from its allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfMemory;

/// Snapshot of how much memory a pool holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Regions currently owned by the pool.
    pub regions: usize,
    /// Total bytes across all regions, headers included.
    pub capacity: usize,
    /// Bytes handed out since the last rewind.
    pub used: usize,
}

/// Bookkeeping at the base of one region `[base, base + layout.size())`.
///
/// Free space is `[base + HEADER_SIZE, base + end)`; allocation moves `end`
/// down.
#[derive(Clone, Copy)]
struct Header {
    next: Option<NonNull<Header>>,
    layout: Layout,
    end: usize,
}

impl Header {
    #[inline]
    fn remaining(&self) -> usize {
        self.end - HEADER_SIZE
    }
}

/// Carves `size` bytes off the top of `region`'s free space.
///
/// # Safety
///
/// `region` must be a live header of this pool with at least `size` bytes
/// remaining.
#[inline]
unsafe fn bump(mut region: NonNull<Header>, size: usize) -> NonNull<u8> {
    // SAFETY: the caller guarantees `region` is live; nothing else borrows
    // the header bytes.
    let header = unsafe { region.as_mut() };
    debug_assert!(size <= header.remaining());
    header.end -= size;
    // SAFETY: `end` stays within the region.
    unsafe { region.cast::<u8>().add(header.end) }
}

struct PoolInner<A> {
    /// First region; later ones follow through [`Header::next`].
    head: Option<NonNull<Header>>,
    allocator: A,
}

impl<A> PoolInner<A> {
    /// Walks the region list in acquisition order.
    fn regions(&self) -> impl Iterator<Item = NonNull<Header>> + use<A> {
        let mut cursor = self.head;
        core::iter::from_fn(move || {
            let region = cursor?;
            // SAFETY: every header on the list is live until `release_all`,
            // which needs `&mut` access to the pool.
            cursor = unsafe { region.as_ref() }.next;
            Some(region)
        })
    }
}

/// Owner of every region backing one parser session.
pub(crate) struct ArenaPool<A: Allocator> {
    inner: RefCell<PoolInner<A>>,
    region_size: usize,
}

impl<A: Allocator> ArenaPool<A> {
    pub(crate) fn new(allocator: A) -> Self {
        Self::with_region_size(allocator, DEFAULT_REGION_SIZE)
    }

    /// Uses `region_size` (rounded up to [`MAX_ALIGN`]) as the default size
    /// of a fresh region.
    pub(crate) fn with_region_size(allocator: A, region_size: usize) -> Self {
        let mut pool = Self {
            inner: RefCell::new(PoolInner {
                head: None,
                allocator,
            }),
            region_size: DEFAULT_REGION_SIZE,
        };
        pool.set_region_size(region_size);
        pool
    }

    /// Changes the default size of regions acquired from now on.
    pub(crate) fn set_region_size(&mut self, region_size: usize) {
        self.region_size = round_to_align(region_size.max(1)).unwrap_or(DEFAULT_REGION_SIZE);
    }

    /// Carves `size` bytes (rounded up to [`MAX_ALIGN`]) out of the first
    /// region with room, acquiring a new region on a miss.
    fn allocate(&self, size: usize) -> Result<NonNull<u8>, OutOfMemory> {
        let size = round_to_align(size).ok_or(OutOfMemory)?;
        let mut inner = self.inner.borrow_mut();

        let mut tail = None;
        for region in inner.regions() {
            // SAFETY: listed regions are live.
            if unsafe { region.as_ref() }.remaining() >= size {
                // SAFETY: live, and the room was just checked.
                return Ok(unsafe { bump(region, size) });
            }
            tail = Some(region);
        }

        let region = size
            .checked_add(self.region_size)
            .and_then(|n| n.checked_add(HEADER_SIZE))
            .ok_or(OutOfMemory)?;
        let layout = Layout::from_size_align(region, MAX_ALIGN).map_err(|_| OutOfMemory)?;
        let Some(base) = inner.allocator.allocate(layout) else {
            log::debug!("allocator refused a region of {region} bytes");
            return Err(OutOfMemory);
        };
        // SAFETY: `base` points to `region` writable bytes, aligned to
        // `MAX_ALIGN`, which covers `Header`.
        let header = unsafe {
            ptr::write_bytes(base.as_ptr(), 0, region);
            let header = base.cast::<Header>();
            header.as_ptr().write(Header {
                next: None,
                layout,
                end: region,
            });
            header
        };
        log::trace!("acquired arena region of {region} bytes");

        match tail {
            // SAFETY: `tail` is live, and no reference to it is held.
            Some(mut tail) => unsafe { tail.as_mut() }.next = Some(header),
            None => inner.head = Some(header),
        }
        // SAFETY: the fresh region has `region - HEADER_SIZE >= size` bytes.
        Ok(unsafe { bump(header, size) })
    }

    /// Uninitialized room for `len` values of `T`.
    ///
    /// The slice stays valid until the next [`rewind`](Self::rewind) or
    /// [`release_all`](Self::release_all), both of which need `&mut self`.
    #[allow(clippy::mut_from_ref)]
    pub(crate) fn alloc_uninit<T: Copy>(
        &self,
        len: usize,
    ) -> Result<&mut [MaybeUninit<T>], OutOfMemory> {
        const { assert!(mem::align_of::<T>() <= MAX_ALIGN) };

        let size = mem::size_of::<T>().checked_mul(len).ok_or(OutOfMemory)?;
        if size == 0 {
            // SAFETY: a dangling, aligned pointer is valid for zero bytes.
            return Ok(unsafe {
                slice::from_raw_parts_mut(NonNull::<MaybeUninit<T>>::dangling().as_ptr(), len)
            });
        }
        let ptr = self.allocate(size)?;
        // SAFETY: the block is `size` bytes, aligned to `MAX_ALIGN` (which
        // covers `T`), disjoint from every other live allocation, and lives
        // as long as `&self` since freeing needs `&mut self`.
        Ok(unsafe { slice::from_raw_parts_mut(ptr.as_ptr().cast::<MaybeUninit<T>>(), len) })
    }

    /// `len` zeroed bytes.
    #[allow(clippy::mut_from_ref)]
    pub(crate) fn alloc_zeroed(&self, len: usize) -> Result<&mut [u8], OutOfMemory> {
        let block = self.alloc_uninit::<u8>(len)?;
        block.fill(MaybeUninit::new(0));
        // SAFETY: every byte was just initialized.
        Ok(unsafe { slice::from_raw_parts_mut(block.as_mut_ptr().cast::<u8>(), block.len()) })
    }

    /// Makes every region fully available again without returning any of
    /// them to the allocator.
    pub(crate) fn rewind(&mut self) {
        for mut region in self.inner.get_mut().regions() {
            // SAFETY: listed regions are live, and `&mut self` rules out
            // outstanding allocations.
            let header = unsafe { region.as_mut() };
            header.end = header.layout.size();
        }
    }

    /// Returns every region, headers included, to the allocator.
    pub(crate) fn release_all(&mut self) {
        let PoolInner { head, allocator } = self.inner.get_mut();
        let mut released = 0usize;
        let mut cursor = head.take();
        while let Some(region) = cursor {
            // SAFETY: the header is live; it is copied out before its region
            // is freed.
            let Header { next, layout, .. } = unsafe { region.as_ptr().read() };
            cursor = next;
            // SAFETY: each region came from this allocator with this layout
            // and is freed exactly once, as it leaves the list here.
            unsafe { allocator.free(region.cast(), layout) };
            released += 1;
        }
        if released > 0 {
            log::trace!("released {released} arena regions");
        }
    }

    pub(crate) fn stats(&self) -> ArenaStats {
        let inner = self.inner.borrow();
        inner
            .regions()
            .fold(ArenaStats::default(), |mut stats, region| {
                // SAFETY: listed regions are live.
                let header = unsafe { region.as_ref() };
                stats.regions += 1;
                stats.capacity += header.layout.size();
                stats.used += header.layout.size() - header.end;
                stats
            })
    }
}

impl<A: Allocator> Drop for ArenaPool<A> {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl<A: Allocator> fmt::Debug for ArenaPool<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaPool")
            .field("region_size", &self.region_size)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[inline]
fn round_to_align(size: usize) -> Option<usize> {
    size.checked_next_multiple_of(MAX_ALIGN)
}

/// Growable array whose storage lives in an [`ArenaPool`].
///
/// Growing allocates a block twice the size and copies; the old block stays
/// in the arena until the pool is rewound.
pub(crate) struct ArenaVec<'a, T> {
    buf: &'a mut [MaybeUninit<T>],
    len: usize,
}

impl<'a, T: Copy> ArenaVec<'a, T> {
    const INITIAL_CAPACITY: usize = 8;

    pub(crate) fn new() -> Self {
        Self {
            buf: Default::default(),
            len: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `value`. On allocation failure the vector is emptied.
    pub(crate) fn push<A: Allocator>(
        &mut self,
        pool: &'a ArenaPool<A>,
        value: T,
    ) -> Result<(), OutOfMemory> {
        if self.len == self.buf.len() {
            self.grow(pool)?;
        }
        self.buf[self.len] = MaybeUninit::new(value);
        self.len += 1;
        Ok(())
    }

    fn grow<A: Allocator>(&mut self, pool: &'a ArenaPool<A>) -> Result<(), OutOfMemory> {
        let capacity = if self.buf.is_empty() {
            Self::INITIAL_CAPACITY
        } else {
            self.buf.len().checked_mul(2).ok_or(OutOfMemory)?
        };
        let grown = match pool.alloc_uninit::<T>(capacity) {
            Ok(grown) => grown,
            Err(err) => {
                *self = Self::new();
                return Err(err);
            }
        };
        grown[..self.len].copy_from_slice(&self.buf[..self.len]);
        self.buf = grown;
        Ok(())
    }

    /// Freezes the contents into a slice with the arena's lifetime.
    pub(crate) fn into_slice(self) -> &'a [T] {
        let buf: &'a [MaybeUninit<T>] = self.buf;
        // SAFETY: the first `len` slots were written by `push`.
        unsafe { slice::from_raw_parts(buf.as_ptr().cast::<T>(), self.len) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{allocator::SystemAllocator, tests::support::CountingAllocator};

    #[test]
    fn allocations_are_aligned_and_bump_down() {
        let pool = ArenaPool::new(SystemAllocator);
        let first = pool.allocate(3).unwrap();
        let second = pool.allocate(5).unwrap();
        assert_eq!(first.as_ptr() as usize % MAX_ALIGN, 0);
        assert_eq!(second.as_ptr() as usize % MAX_ALIGN, 0);
        assert_eq!(first.as_ptr() as usize - second.as_ptr() as usize, MAX_ALIGN);
        assert_eq!(pool.stats().regions, 1);
    }

    #[test]
    fn oversized_request_gets_dedicated_region() {
        let pool = ArenaPool::new(SystemAllocator);
        pool.allocate(16).unwrap();
        pool.allocate(4096).unwrap();
        let stats = pool.stats();
        assert_eq!(stats.regions, 2);
        assert_eq!(
            stats.capacity,
            (16 + DEFAULT_REGION_SIZE + HEADER_SIZE) + (4096 + DEFAULT_REGION_SIZE + HEADER_SIZE)
        );
    }

    #[test]
    fn first_fit_reuses_earlier_region() {
        let pool = ArenaPool::with_region_size(SystemAllocator, 64);
        pool.allocate(64).unwrap(); // 128 free, 64 left
        pool.allocate(200).unwrap(); // new region, 272 free, 64 left
        pool.allocate(48).unwrap(); // fits the first region
        let stats = pool.stats();
        assert_eq!(stats.regions, 2);
        assert_eq!(stats.used, 64 + 208 + 48);
    }

    #[test]
    fn refused_region_reports_out_of_memory() {
        let pool = ArenaPool::new(CountingAllocator::with_budget(0));
        assert_eq!(pool.allocate(8), Err(OutOfMemory));
    }

    #[test]
    fn release_all_frees_every_region() {
        let allocator = CountingAllocator::new();
        let counters = allocator.counters();
        let mut pool = ArenaPool::with_region_size(allocator, 32);
        for _ in 0..10 {
            pool.allocate(40).unwrap();
        }
        assert_eq!(counters.allocations(), 10);
        pool.release_all();
        assert_eq!(counters.frees(), 10);
        assert_eq!(pool.stats(), ArenaStats::default());
    }

    #[test]
    fn region_bookkeeping_comes_from_the_allocator() {
        let allocator = CountingAllocator::new();
        let counters = allocator.counters();
        let mut pool = ArenaPool::with_region_size(allocator, 16);
        for _ in 0..50 {
            pool.allocate(32).unwrap();
        }
        let stats = pool.stats();
        assert_eq!(stats.regions, 50);
        assert_eq!(counters.allocations(), 50);
        assert_eq!(stats.capacity, 50 * (32 + 16 + HEADER_SIZE));
        assert_eq!(stats.used, 50 * 32);

        // The earliest region still has room and is found by walking the chain.
        pool.allocate(16).unwrap();
        assert_eq!(counters.allocations(), 50);

        pool.release_all();
        assert_eq!(counters.live(), 0);
    }

    #[test]
    fn drop_releases_regions() {
        let allocator = CountingAllocator::new();
        let counters = allocator.counters();
        {
            let pool = ArenaPool::new(allocator);
            pool.allocate(8).unwrap();
            pool.allocate(2048).unwrap();
        }
        assert_eq!(counters.allocations(), 2);
        assert_eq!(counters.frees(), 2);
    }

    #[test]
    fn rewind_reuses_regions_without_allocating() {
        let allocator = CountingAllocator::new();
        let counters = allocator.counters();
        let mut pool = ArenaPool::new(allocator);
        pool.allocate(512).unwrap();
        pool.rewind();
        assert_eq!(pool.stats().used, 0);
        pool.allocate(512).unwrap();
        assert_eq!(counters.allocations(), 1);
    }

    #[test]
    fn zeroed_bytes_are_zero_after_rewind() {
        let mut pool = ArenaPool::new(SystemAllocator);
        pool.alloc_zeroed(32).unwrap().fill(0xAA);
        pool.rewind();
        assert!(pool.alloc_zeroed(32).unwrap().iter().all(|b| *b == 0));
    }

    #[test]
    fn arena_vec_keeps_contents_across_growth() {
        let pool = ArenaPool::new(SystemAllocator);
        let mut vec = ArenaVec::new();
        for i in 0..100u64 {
            vec.push(&pool, i).unwrap();
        }
        assert_eq!(vec.len(), 100);
        let slice = vec.into_slice();
        assert!(slice.iter().copied().eq(0..100));
    }

    #[test]
    fn arena_vec_empties_itself_on_failure() {
        let pool = ArenaPool::new(CountingAllocator::with_budget(1));
        let mut vec = ArenaVec::new();
        // The single permitted region absorbs the first doublings; the
        // 128-slot block needs a second one.
        let mut result = Ok(());
        for i in 0..200u64 {
            result = vec.push(&pool, i);
            if result.is_err() {
                break;
            }
        }
        assert_eq!(result, Err(OutOfMemory));
        assert!(vec.is_empty());
    }
}
