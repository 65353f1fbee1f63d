//! Window onto the first megabyte.
//!
//! Real-mode firmware only sees addresses below 1 MiB. The loader maps
//! (or identity-maps) some part of that range and tells us where; every
//! far pointer firmware hands back is resolved through this window and
//! rejected when it falls outside.

use vesacon_display::vbe::{FarPtr, BOUNCE_SIZE};

/// First linear address past real-mode reach.
pub const REAL_MODE_LIMIT: u32 = 0x10_0000;

/// Mapped part of low memory plus the bounce region inside it.
#[derive(Debug)]
pub struct LowMemWindow {
    /// Where linear address `start` is mapped.
    base: *mut u8,
    /// First linear address covered.
    start: u32,
    /// Bytes covered.
    len: u32,
    /// Linear address of the bounce region.
    bounce: u32,
}

impl LowMemWindow {
    /// Describe a window of `len` bytes starting at linear `start`, mapped
    /// at `base`, with the bounce region at linear `bounce`.
    ///
    /// `None` when the window leaves real-mode reach or the bounce region
    /// does not fit inside it.
    ///
    /// # Safety
    /// `base..base + len` must stay valid for reads and writes for the
    /// lifetime of the window, and nothing else may access it while a
    /// firmware call is not in progress.
    pub unsafe fn new(base: *mut u8, start: u32, len: u32, bounce: u32) -> Option<Self> {
        if base.is_null() {
            return None;
        }
        let end = start.checked_add(len)?;
        let bounce_end = bounce.checked_add(BOUNCE_SIZE as u32)?;
        if end > REAL_MODE_LIMIT || bounce < start || bounce_end > end {
            return None;
        }
        Some(Self {
            base,
            start,
            len,
            bounce,
        })
    }

    /// Window over identity-mapped low memory from `start` up to 1 MiB.
    ///
    /// # Safety
    /// See [`LowMemWindow::new`]; low memory must be identity mapped.
    pub unsafe fn identity(start: u32, bounce: u32) -> Option<Self> {
        let len = REAL_MODE_LIMIT.checked_sub(start)?;
        Self::new(start as usize as *mut u8, start, len, bounce)
    }

    /// Linear range covered.
    pub fn range(&self) -> core::ops::Range<u32> {
        self.start..self.start + self.len
    }

    /// Offset into the mapping of `len` bytes at `linear`, if covered.
    fn offset_of(&self, linear: u32, len: usize) -> Option<usize> {
        let rel = linear.checked_sub(self.start)? as usize;
        let end = rel.checked_add(len)?;
        if end > self.len as usize {
            return None;
        }
        Some(rel)
    }

    pub fn bounce_ptr(&self) -> FarPtr {
        // Checked in new(): bounce < REAL_MODE_LIMIT
        FarPtr::from_linear(self.bounce).unwrap_or(FarPtr::NULL)
    }

    /// Bytes at `ptr`, or `None` if any of them is outside the window.
    pub fn slice(&self, ptr: FarPtr, len: usize) -> Option<&[u8]> {
        let off = self.offset_of(ptr.linear(), len)?;
        // SAFETY: range checked against the mapping
        Some(unsafe { core::slice::from_raw_parts(self.base.add(off), len) })
    }

    pub fn bounce(&self) -> &[u8] {
        let off = (self.bounce - self.start) as usize;
        // SAFETY: bounce region checked in new()
        unsafe { core::slice::from_raw_parts(self.base.add(off), BOUNCE_SIZE) }
    }

    pub fn bounce_mut(&mut self) -> &mut [u8] {
        let off = (self.bounce - self.start) as usize;
        // SAFETY: bounce region checked in new()
        unsafe { core::slice::from_raw_parts_mut(self.base.add(off), BOUNCE_SIZE) }
    }
}
