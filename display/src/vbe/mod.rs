//! VESA BIOS Extensions interface.
//!
//! The console core talks to firmware only through the [`Firmware`] trait:
//! a synchronous interrupt gateway plus a small window of low memory the
//! firmware can reach. Everything real-mode specific (thunking, segment
//! arithmetic, identity mapping) lives in the implementation, not here.
//!
//! # Layout
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  call.rs   typed requests (00h/01h/02h,  │
//! │            1130h, text fallback)         │
//! └──────────────────┬───────────────────────┘
//!                    │ Registers in / out
//!                    ▼
//! ┌──────────────────────────────────────────┐
//! │  Firmware  intcall + bounce + resolve    │
//! └──────────────────────────────────────────┘
//! ```

pub mod call;
pub mod info;
pub mod regs;

pub use call::{CallError, RomFont, BOUNCE_SIZE};
pub use info::{GeneralInfo, MemoryLayout, ModeAttributes, ModeInfo, SetModeFlags, MODE_LIST_END};
pub use regs::{FarPtr, Registers};

/// Firmware call gateway and the low memory it shares with the caller.
///
/// Exactly one call is outstanding at a time. The bounce region is reused
/// by every call, so anything read from it must be copied out before the
/// next `intcall`.
pub trait Firmware {
    /// Issue software interrupt `vector` with `regs` loaded and return the
    /// register block firmware hands back. Blocks until firmware is done.
    fn intcall(&mut self, vector: u8, regs: &Registers) -> Registers;

    /// Firmware-reachable address of the bounce region.
    fn bounce_ptr(&self) -> FarPtr;

    /// Local view of the bounce region (at least [`BOUNCE_SIZE`] bytes).
    fn bounce(&self) -> &[u8];

    fn bounce_mut(&mut self) -> &mut [u8];

    /// Map `len` bytes at a firmware far pointer into local memory.
    /// `None` when the range is not addressable.
    fn resolve(&self, ptr: FarPtr, len: usize) -> Option<&[u8]>;
}

impl<F: Firmware + ?Sized> Firmware for &mut F {
    fn intcall(&mut self, vector: u8, regs: &Registers) -> Registers {
        (**self).intcall(vector, regs)
    }

    fn bounce_ptr(&self) -> FarPtr {
        (**self).bounce_ptr()
    }

    fn bounce(&self) -> &[u8] {
        (**self).bounce()
    }

    fn bounce_mut(&mut self) -> &mut [u8] {
        (**self).bounce_mut()
    }

    fn resolve(&self, ptr: FarPtr, len: usize) -> Option<&[u8]> {
        (**self).resolve(ptr, len)
    }
}
