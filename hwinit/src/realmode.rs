//! Real-mode firmware gateway.
//!
//! Pairs the loader's interrupt thunk with a [`LowMemWindow`] and exposes
//! both as [`vesacon_display::Firmware`]. How the thunk gets to real mode
//! (a Syslinux-style `__intcall`, V86, an emulator) is the loader's
//! business.

use vesacon_display::vbe::{FarPtr, Firmware, Registers};

use crate::lowmem::LowMemWindow;

/// Synchronous software-interrupt thunk into real mode.
///
/// # Safety
/// Implementations must issue exactly the requested interrupt with the
/// given registers, return the registers firmware left behind, and make
/// memory writes done by firmware visible through the loader's low-memory
/// mapping before returning.
pub unsafe trait Thunk {
    fn intcall(&mut self, vector: u8, input: &Registers, output: &mut Registers);
}

/// [`Firmware`] over a real-mode thunk.
pub struct RealModeFirmware<T: Thunk> {
    thunk: T,
    window: LowMemWindow,
    calls: u32,
}

impl<T: Thunk> RealModeFirmware<T> {
    pub fn new(thunk: T, window: LowMemWindow) -> Self {
        Self {
            thunk,
            window,
            calls: 0,
        }
    }

    pub fn window(&self) -> &LowMemWindow {
        &self.window
    }

    /// Firmware calls issued so far.
    pub fn call_count(&self) -> u32 {
        self.calls
    }

    /// Give back the thunk and the window.
    pub fn into_parts(self) -> (T, LowMemWindow) {
        (self.thunk, self.window)
    }
}

impl<T: Thunk> Firmware for RealModeFirmware<T> {
    fn intcall(&mut self, vector: u8, regs: &Registers) -> Registers {
        let mut out = Registers::new();
        log::trace!(
            target: "vesacon",
            "INT {:02x}h AX={:04x} BX={:04x} CX={:04x} ES:DI={:04x}:{:04x}",
            vector,
            regs.ax(),
            regs.bx(),
            regs.cx(),
            regs.es,
            regs.di()
        );
        self.thunk.intcall(vector, regs, &mut out);
        self.calls += 1;
        log::trace!(target: "vesacon", "  -> AX={:04x}", out.ax());
        out
    }

    fn bounce_ptr(&self) -> FarPtr {
        self.window.bounce_ptr()
    }

    fn bounce(&self) -> &[u8] {
        self.window.bounce()
    }

    fn bounce_mut(&mut self) -> &mut [u8] {
        self.window.bounce_mut()
    }

    fn resolve(&self, ptr: FarPtr, len: usize) -> Option<&[u8]> {
        self.window.slice(ptr, len)
    }
}
