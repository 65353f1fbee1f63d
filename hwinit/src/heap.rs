//! Static-pool heap for the console's text grid.
//!
//! Uses linked_list_allocator over a buffer in .bss. The loader either
//! installs it as `#[global_allocator]` (feature `global-allocator`) or
//! keeps its own allocator and never calls into this module.
//!
//! # Usage
//!
//! ```ignore
//! // Before the first allocation:
//! vesacon_hwinit::heap::init_heap();
//!
//! // Now the text grid can be built:
//! vesacon_display::init(&mut ctx, &mut fw, &config);
//! ```

use core::alloc::{GlobalAlloc, Layout};
use core::ptr::NonNull;
use core::sync::atomic::{AtomicBool, Ordering};

use linked_list_allocator::Heap;

/// Heap size: the largest grid (8x8 font at 640x480, 62x82 cells) takes
/// 20,336 bytes, the rest is headroom for the loader.
pub const HEAP_SIZE: usize = 256 * 1024;

/// Page-aligned heap buffer wrapper
#[repr(C, align(4096))]
struct AlignedHeapBuffer([u8; HEAP_SIZE]);

/// Static heap buffer - lives in .bss, zero-initialized
static mut HEAP_BUFFER: AlignedHeapBuffer = AlignedHeapBuffer([0u8; HEAP_SIZE]);

/// Locked heap wrapper implementing GlobalAlloc
pub struct LockedHeap {
    inner: spin::Mutex<Heap>,
}

impl LockedHeap {
    /// Create an empty (uninitialized) heap
    pub const fn empty() -> Self {
        Self {
            inner: spin::Mutex::new(Heap::empty()),
        }
    }

    /// Initialize the heap with a memory region
    ///
    /// # Safety
    /// - Must be called exactly once
    /// - Memory region must be valid and not used elsewhere
    pub unsafe fn init(&self, start: *mut u8, size: usize) {
        self.inner.lock().init(start, size);
    }

    /// (total, used, free) in bytes.
    pub fn stats(&self) -> (usize, usize, usize) {
        let heap = self.inner.lock();
        (heap.size(), heap.used(), heap.free())
    }
}

unsafe impl GlobalAlloc for LockedHeap {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.inner
            .lock()
            .allocate_first_fit(layout)
            .map(|nn| nn.as_ptr())
            .unwrap_or(core::ptr::null_mut())
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if let Some(nn) = NonNull::new(ptr) {
            self.inner.lock().deallocate(nn, layout);
        }
    }
}

#[cfg_attr(feature = "global-allocator", global_allocator)]
static GLOBAL: LockedHeap = LockedHeap::empty();

static HEAP_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Hand the static pool to the heap.
///
/// Safe to call multiple times - only initializes once. Must run before
/// the first allocation when `global-allocator` is enabled.
pub fn init_heap() {
    if HEAP_INITIALIZED.swap(true, Ordering::AcqRel) {
        return;
    }

    // SAFETY: guarded by HEAP_INITIALIZED, the buffer is handed out once
    // and never touched directly afterwards.
    unsafe {
        let start = core::ptr::addr_of_mut!(HEAP_BUFFER.0) as *mut u8;
        GLOBAL.init(start, HEAP_SIZE);
    }

    log::debug!(target: "vesacon", "heap: {} KiB static pool", HEAP_SIZE / 1024);
}

pub fn is_heap_initialized() -> bool {
    HEAP_INITIALIZED.load(Ordering::Acquire)
}

/// Get heap statistics: (total, used, free).
pub fn heap_stats() -> Option<(usize, usize, usize)> {
    if !is_heap_initialized() {
        return None;
    }
    Some(GLOBAL.stats())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C, align(16))]
    struct Pool([u8; 4096]);

    #[test]
    fn test_alloc_dealloc() {
        let mut pool = Pool([0u8; 4096]);
        let heap = LockedHeap::empty();
        unsafe { heap.init(pool.0.as_mut_ptr(), pool.0.len()) };

        let layout = Layout::from_size_align(128, 8).unwrap();
        let p = unsafe { heap.alloc(layout) };
        assert!(!p.is_null());
        assert_eq!(p as usize % 8, 0);
        let (total, used, _) = heap.stats();
        assert!(total > 0 && total <= 4096);
        assert!(used >= 128);

        unsafe { heap.dealloc(p, layout) };
        assert_eq!(heap.stats().1, 0);
    }

    #[test]
    fn test_exhaustion_returns_null() {
        let mut pool = Pool([0u8; 4096]);
        let heap = LockedHeap::empty();
        unsafe { heap.init(pool.0.as_mut_ptr(), pool.0.len()) };

        let layout = Layout::from_size_align(8192, 8).unwrap();
        assert!(unsafe { heap.alloc(layout) }.is_null());
    }

    #[test]
    fn test_uninitialized_heap_is_empty() {
        let heap = LockedHeap::empty();
        let layout = Layout::from_size_align(16, 8).unwrap();
        assert!(unsafe { heap.alloc(layout) }.is_null());
    }

    #[test]
    fn test_static_pool() {
        init_heap();
        init_heap();
        let (total, _, free) = heap_stats().unwrap();
        assert!(total > 0 && total <= HEAP_SIZE);
        assert!(free <= total);
    }
}
