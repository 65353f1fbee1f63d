//! Serial debug output (COM1 @ 0x3F8)
//!
//! Polling only: no buffering, no interrupts. Also hosts the `log`
//! backend so `log::info!` and friends end up on the wire.

use core::fmt::{self, Write};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

const COM1: u16 = 0x3F8;
const COM1_LSR: u16 = COM1 + 5;
const LSR_TX_EMPTY: u8 = 0x20;

/// Write byte to COM1. Bounded wait, gives up after ~100 spins.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[inline]
pub fn putc(b: u8) {
    unsafe {
        for _ in 0..100 {
            let status: u8;
            core::arch::asm!(
                "in al, dx",
                in("dx") COM1_LSR,
                out("al") status,
                options(nomem, nostack, preserves_flags)
            );
            if status & LSR_TX_EMPTY != 0 {
                core::arch::asm!(
                    "out dx, al",
                    in("dx") COM1,
                    in("al") b,
                    options(nomem, nostack, preserves_flags)
                );
                return;
            }
            core::hint::spin_loop();
        }
    }
}

/// No UART on this architecture.
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
#[inline]
pub fn putc(_b: u8) {}

/// Write string to COM1, LF expanded to CRLF.
pub fn puts(s: &str) {
    for b in s.bytes() {
        if b == b'\n' {
            putc(b'\r');
        }
        putc(b);
    }
}

/// `fmt::Write` over COM1.
pub struct SerialPort;

impl Write for SerialPort {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        puts(s);
        Ok(())
    }
}

/// Short level tag used at the start of each line.
fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERR ",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DBG ",
        Level::Trace => "TRC ",
    }
}

/// Render one record as `[LEVEL target] message\n`.
pub fn write_record<W: Write>(out: &mut W, record: &Record<'_>) -> fmt::Result {
    writeln!(
        out,
        "[{} {}] {}",
        level_tag(record.level()),
        record.target(),
        record.args()
    )
}

/// `log` backend writing to COM1.
///
/// Filters on `log::max_level()`, so whatever level was set last wins.
pub struct SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let _ = write_record(&mut SerialPort, record);
        }
    }

    fn flush(&self) {}
}

static LOGGER: SerialLogger = SerialLogger;

/// Install the serial logger as the global `log` backend.
///
/// Fails if another logger was installed first; the level filter is
/// applied either way.
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_max_level(level);
    log::set_logger(&LOGGER)
}
