//! Boot-side glue for the VESA console.
//!
//! `vesacon-display` only knows the abstract [`Firmware`] gateway. This
//! crate supplies what a real loader needs around it:
//!
//! ```text
//! loader
//!   │  Thunk (real-mode INT)      LowMemWindow (first MiB)
//!   └────────────┬───────────────────────┘
//!                ▼
//!        RealModeFirmware  ──impl──►  vesacon_display::Firmware
//!                │
//!                ▼
//!        bring_up(): serial logger, heap, vesacon_display::init
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use vesacon_hwinit::{bring_up, LowMemWindow, RealModeFirmware};
//!
//! let window = unsafe { LowMemWindow::identity(0x500, BOUNCE_LINEAR) }.unwrap();
//! let mut fw = RealModeFirmware::new(MyIntcall, window);
//! let code = bring_up(&mut CONSOLE, &mut fw, &InitConfig::default(), LevelFilter::Info);
//! ```

#![no_std]

pub mod heap;
pub mod lowmem;
pub mod realmode;
pub mod serial;

pub use heap::{heap_stats, init_heap, is_heap_initialized, LockedHeap};
pub use lowmem::{LowMemWindow, REAL_MODE_LIMIT};
pub use realmode::{RealModeFirmware, Thunk};
pub use serial::{init_logger, SerialLogger};

use log::LevelFilter;
use vesacon_display::{DisplayContext, Firmware, InitConfig, VesaInitError};

/// Full console bring-up for a loader with no other infrastructure.
///
/// Installs the serial logger (kept if one is already installed), hands
/// the static pool to the heap, then runs the console init sequence.
/// Returns the console outcome code.
pub fn bring_up<F: Firmware + ?Sized>(
    ctx: &mut DisplayContext,
    fw: &mut F,
    config: &InitConfig,
    level: LevelFilter,
) -> i32 {
    // Already installed is fine, the new level still applies
    let _ = init_logger(level);
    heap::init_heap();

    let code = vesacon_display::init(ctx, fw, config);
    match VesaInitError::from_code(code) {
        None => {
            if let Some(mode) = ctx.mode() {
                log::info!(
                    target: "vesacon",
                    "console up: mode 0x{:04x} {}x{}, {} text rows",
                    mode.mode_number(),
                    mode.width(),
                    mode.height(),
                    ctx.text_rows()
                );
            }
        }
        Some(e) => log::error!(target: "vesacon", "console init failed: {}", e),
    }
    code
}
