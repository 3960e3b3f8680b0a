//! Bump arena for compiler data.
//!
//! One [`LocalArena`] owns every AST node, type, identifier and payload slice
//! of a compilation unit. Allocation hands out references bound to the arena
//! borrow, so nothing allocated here can outlive it, and the whole arena is
//! released at once when it is dropped.
//!
//! - **Fast allocation** through a bump pointer
//! - **Stable addresses**: chunks never move or reallocate
//! - **Shared allocation**: `alloc` takes `&self`, so many nodes can hold
//!   references into the arena while more nodes are being built
//!
//! Values are never dropped individually. Only types without drop glue may
//! be allocated; this is checked in debug builds.
//!
//! # Examples
//!
//! ```
//! use ferrule_mem::arena::LocalArena;
//!
//! let arena = LocalArena::new(8192);
//!
//! let a = arena.alloc(42u32);
//! let b = arena.alloc_slice_copy(&[1u16, 2, 3]);
//! let s = arena.alloc_str("value");
//!
//! assert_eq!(*a, 42);
//! assert_eq!(b, &[1, 2, 3]);
//! assert_eq!(s, "value");
//! ```

use std::alloc::{self, Layout};
use std::cell::{Cell, RefCell};
use std::ptr::NonNull;

use ferrule_log::trace;

/// Base alignment of every chunk.
const DEFAULT_ALIGNMENT: usize = 8;

/// Minimum chunk size (8 KiB).
const MIN_CHUNK_SIZE: usize = 8192;

/// Growth stops doubling at this size (1 MiB).
const MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// Chunk size suited to a single compilation unit's syntax tree.
pub const SYNTAX_CHUNK_SIZE: usize = 8192;

/// Arena allocation statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaStats {
    /// Bytes handed out, including alignment padding.
    pub total_allocated: usize,
    /// Number of chunks in the arena.
    pub chunk_count: usize,
    /// Total capacity of all chunks in bytes.
    pub total_capacity: usize,
}

/// A fixed-size block of memory with a bump pointer.
///
/// The memory is obtained from the global allocator and returned when the
/// chunk is dropped. The bump pointer only moves forward.
struct LocalChunk {
    start: NonNull<u8>,
    /// Next free byte. Kept as a pointer to preserve provenance.
    ptr: Cell<*mut u8>,
    end: usize,
    capacity: usize,
}

impl LocalChunk {
    fn new(size: usize) -> Self {
        let layout = chunk_layout(size);

        // SAFETY: layout has non-zero size (size >= MIN_CHUNK_SIZE).
        let raw = unsafe { alloc::alloc(layout) };
        let Some(start) = NonNull::new(raw) else {
            alloc::handle_alloc_error(layout);
        };

        LocalChunk {
            start,
            ptr: Cell::new(start.as_ptr()),
            end: start.as_ptr().addr() + size,
            capacity: size,
        }
    }

    /// Carves `size` bytes at `align` out of this chunk, if they fit.
    #[inline(always)]
    fn try_alloc(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        let current = self.ptr.get();
        let aligned_start = (current.addr() + align - 1) & !(align - 1);
        let new_addr = aligned_start.checked_add(size)?;

        if new_addr > self.end {
            return None;
        }

        self.ptr.set(current.with_addr(new_addr));

        // SAFETY: aligned_start lies inside this chunk (checked above) and
        // the chunk start is non-null.
        Some(unsafe { NonNull::new_unchecked(current.with_addr(aligned_start)) })
    }

    fn used(&self) -> usize {
        self.ptr.get().addr() - self.start.as_ptr().addr()
    }
}

impl Drop for LocalChunk {
    fn drop(&mut self) {
        // SAFETY: start was allocated in `new` with exactly this layout.
        unsafe {
            alloc::dealloc(self.start.as_ptr(), chunk_layout(self.capacity));
        }
    }
}

fn chunk_layout(size: usize) -> Layout {
    match Layout::from_size_align(size, DEFAULT_ALIGNMENT) {
        Ok(layout) => layout,
        Err(_) => panic!("arena chunk size {size} overflows the address space"),
    }
}

/// Single-threaded bump arena.
///
/// `LocalArena` is `!Sync`: its bump pointers live in `Cell`s. It grows by
/// appending chunks that double in size up to 1 MiB, or larger when a single
/// request needs it.
///
/// # Examples
///
/// ```
/// use ferrule_mem::arena::LocalArena;
///
/// let arena = LocalArena::new(8192);
/// let values: Vec<&u64> = (0..4).map(|i| &*arena.alloc(i)).collect();
///
/// assert_eq!(*values[3], 3);
/// assert_eq!(arena.stats().chunk_count, 1);
/// ```
pub struct LocalArena {
    chunks: RefCell<Vec<LocalChunk>>,
    allocated: Cell<usize>,
}

impl LocalArena {
    /// Creates an arena whose first chunk has at least `initial_size` bytes.
    ///
    /// Sizes below 8 KiB are raised to 8 KiB and every size is rounded up to
    /// a power of two.
    #[must_use]
    pub fn new(initial_size: usize) -> Self {
        let size = initial_size.max(MIN_CHUNK_SIZE).next_power_of_two();

        LocalArena {
            chunks: RefCell::new(vec![LocalChunk::new(size)]),
            allocated: Cell::new(0),
        }
    }

    /// Moves `value` into the arena and returns a reference to it.
    ///
    /// The reference lives as long as the borrow of the arena.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub fn alloc<T>(&self, value: T) -> &mut T {
        debug_assert!(
            !std::mem::needs_drop::<T>(),
            "arena values are never dropped"
        );

        let ptr = self.alloc_raw(Layout::new::<T>()).cast::<T>();

        // SAFETY: ptr is freshly allocated, aligned for T and large enough.
        // It is handed out exactly once.
        unsafe {
            ptr.as_ptr().write(value);
            &mut *ptr.as_ptr()
        }
    }

    /// Copies `src` into the arena.
    ///
    /// An empty input yields an empty slice without touching the chunks.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice_copy<T: Copy>(&self, src: &[T]) -> &mut [T] {
        if src.is_empty() {
            return &mut [];
        }

        let ptr = self.alloc_array::<T>(src.len());

        // SAFETY: the destination holds src.len() elements of T and cannot
        // overlap src, which lives outside this fresh allocation.
        unsafe {
            std::ptr::copy_nonoverlapping(src.as_ptr(), ptr.as_ptr(), src.len());
            std::slice::from_raw_parts_mut(ptr.as_ptr(), src.len())
        }
    }

    /// Moves every item of an exact-size iterator into one arena slice.
    ///
    /// # Panics
    ///
    /// Panics if the iterator yields fewer items than it reported.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice_fill_iter<T, I>(&self, iter: I) -> &mut [T]
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        debug_assert!(
            !std::mem::needs_drop::<T>(),
            "arena values are never dropped"
        );

        let mut iter = iter.into_iter();
        let len = iter.len();
        if len == 0 {
            return &mut [];
        }

        let ptr = self.alloc_array::<T>(len);
        for i in 0..len {
            let Some(item) = iter.next() else {
                panic!("iterator reported {len} items but ended after {i}");
            };
            // SAFETY: i < len, inside the allocation made above.
            unsafe { ptr.as_ptr().add(i).write(item) };
        }

        // SAFETY: all len slots were initialised in the loop.
        unsafe { std::slice::from_raw_parts_mut(ptr.as_ptr(), len) }
    }

    /// Copies a string into the arena.
    pub fn alloc_str(&self, s: &str) -> &str {
        let bytes = self.alloc_slice_copy(s.as_bytes());

        // SAFETY: bytes is a verbatim copy of valid UTF-8.
        unsafe { std::str::from_utf8_unchecked(bytes) }
    }

    /// Returns allocation statistics.
    #[must_use]
    pub fn stats(&self) -> ArenaStats {
        let chunks = self.chunks.borrow();
        ArenaStats {
            total_allocated: self.allocated.get(),
            chunk_count: chunks.len(),
            total_capacity: chunks.iter().map(|c| c.capacity).sum(),
        }
    }

    fn alloc_array<T>(&self, len: usize) -> NonNull<T> {
        let Ok(layout) = Layout::array::<T>(len) else {
            panic!("arena slice of {len} elements overflows the address space");
        };
        self.alloc_raw(layout).cast::<T>()
    }

    fn alloc_raw(&self, layout: Layout) -> NonNull<u8> {
        let size = layout.size();
        let align = layout.align();

        loop {
            {
                let chunks = self.chunks.borrow();
                if let Some(chunk) = chunks.last() {
                    let before = chunk.used();
                    if let Some(ptr) = chunk.try_alloc(size, align) {
                        self.allocated
                            .set(self.allocated.get() + chunk.used() - before);
                        return ptr;
                    }
                }
            }

            self.grow(size + align);
        }
    }

    #[cold]
    fn grow(&self, min_size: usize) {
        let mut chunks = self.chunks.borrow_mut();
        let last_size = chunks.last().map_or(MIN_CHUNK_SIZE, |c| c.capacity);
        let new_size = (last_size * 2)
            .min(MAX_CHUNK_SIZE)
            .max(min_size.next_power_of_two());

        trace!("arena growing: chunk #{} of {} bytes", chunks.len(), new_size);
        chunks.push(LocalChunk::new(new_size));
    }
}

impl Default for LocalArena {
    fn default() -> Self {
        Self::new(SYNTAX_CHUNK_SIZE)
    }
}

impl std::fmt::Debug for LocalArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalArena").field("stats", &self.stats()).finish()
    }
}
