//! Init log ring buffer.
//!
//! Captures stage-tagged progress and error lines from console bring-up so
//! the boot UI can dump them after a failure. Every line is also forwarded
//! to the `log` facade, which reaches the serial sink when one is installed.
//!
//! # Design
//!
//! - Fixed-size, no heap
//! - Overwrites oldest entries when full
//! - Recording never fails and never feeds back into the init outcome

use core::fmt::{self, Write};

use spin::Mutex;

/// Maximum message length in bytes
pub const ERROR_MSG_LEN: usize = 96;

/// Number of entries in the ring buffer (power of 2 for efficient modulo)
pub const ERROR_RING_SIZE: usize = 32;

const LOG_TARGET: &str = "vesacon";

/// Stage identifiers for log categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InitStage {
    /// Controller info query (4F00h)
    GeneralInfo = 0,
    /// Mode list walk (4F01h per candidate)
    ModeScan = 1,
    /// Acceptance policy
    ModeFilter = 2,
    /// Set-mode and text fallback
    ModeSet = 3,
    /// ROM font download
    Font = 4,
    /// Text grid allocation
    TextGrid = 5,
    /// General/unknown stage
    General = 6,
}

impl InitStage {
    /// Get human-readable stage name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GeneralInfo => "VBE",
            Self::ModeScan => "SCAN",
            Self::ModeFilter => "FILTER",
            Self::ModeSet => "SETMODE",
            Self::Font => "FONT",
            Self::TextGrid => "TEXT",
            Self::General => "INIT",
        }
    }
}

/// Single log entry in the ring buffer
#[derive(Clone)]
pub struct ErrorLogEntry {
    /// Message content
    pub msg: [u8; ERROR_MSG_LEN],
    /// Actual message length
    pub len: u8,
    /// Initialization stage the line belongs to
    pub stage: InitStage,
    /// True if this is an error, false if just a debug/info log
    pub is_error: bool,
}

impl ErrorLogEntry {
    const fn empty() -> Self {
        Self {
            msg: [0u8; ERROR_MSG_LEN],
            len: 0,
            stage: InitStage::General,
            is_error: false,
        }
    }

    /// Get message as string slice
    pub fn message(&self) -> &str {
        let len = (self.len as usize).min(ERROR_MSG_LEN);
        core::str::from_utf8(&self.msg[..len]).unwrap_or("<invalid utf8>")
    }

    /// Format entry for display: "[STAGE] message" or "[ERR STAGE] message".
    /// Returns bytes written; output is truncated to `buf`.
    pub fn format(&self, buf: &mut [u8]) -> usize {
        let mut out = SliceWriter { buf, pos: 0 };
        let prefix = if self.is_error { "ERR " } else { "" };
        let _ = write!(out, "[{}{}] {}", prefix, self.stage.name(), self.message());
        out.pos
    }
}

impl Default for ErrorLogEntry {
    fn default() -> Self {
        Self::empty()
    }
}

/// Truncating writer over a byte slice. Never splits a UTF-8 sequence.
struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.buf.len() - self.pos;
        let mut take = s.len().min(room);
        while !s.is_char_boundary(take) {
            take -= 1;
        }
        self.buf[self.pos..self.pos + take].copy_from_slice(&s.as_bytes()[..take]);
        self.pos += take;
        Ok(())
    }
}

struct RingState {
    entries: [ErrorLogEntry; ERROR_RING_SIZE],
    /// Next read sequence number
    read: usize,
    /// Total entries written (for overflow detection)
    total: usize,
}

/// Fixed ring of log entries.
pub struct LogRing {
    state: Mutex<RingState>,
}

impl LogRing {
    pub const fn new() -> Self {
        const EMPTY: ErrorLogEntry = ErrorLogEntry::empty();
        Self {
            state: Mutex::new(RingState {
                entries: [EMPTY; ERROR_RING_SIZE],
                read: 0,
                total: 0,
            }),
        }
    }

    /// Record a formatted line.
    pub fn record(&self, stage: InitStage, is_error: bool, args: fmt::Arguments<'_>) {
        let mut entry = ErrorLogEntry::empty();
        entry.stage = stage;
        entry.is_error = is_error;
        let mut out = SliceWriter {
            buf: &mut entry.msg,
            pos: 0,
        };
        let _ = out.write_fmt(args);
        entry.len = out.pos as u8;

        let mut state = self.state.lock();
        let idx = state.total % ERROR_RING_SIZE;
        state.entries[idx] = entry;
        state.total += 1;
    }

    /// Pop the oldest unread entry. Entries overwritten before being read
    /// are skipped.
    pub fn pop(&self) -> Option<ErrorLogEntry> {
        let mut state = self.state.lock();
        if state.read >= state.total {
            return None;
        }
        if state.total - state.read > ERROR_RING_SIZE {
            state.read = state.total - ERROR_RING_SIZE;
        }
        let entry = state.entries[state.read % ERROR_RING_SIZE].clone();
        state.read += 1;
        Some(entry)
    }

    /// Number of entries available to read
    pub fn available(&self) -> usize {
        let state = self.state.lock();
        (state.total - state.read).min(ERROR_RING_SIZE)
    }

    /// Total number of entries ever written
    pub fn count(&self) -> usize {
        self.state.lock().total
    }

    /// Mark everything written so far as read
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.read = state.total;
    }
}

impl Default for LogRing {
    fn default() -> Self {
        Self::new()
    }
}

static INIT_LOG: LogRing = LogRing::new();

fn forward(stage: InitStage, is_error: bool, args: fmt::Arguments<'_>) {
    if is_error {
        log::error!(target: LOG_TARGET, "[{}] {}", stage.name(), args);
    } else {
        log::debug!(target: LOG_TARGET, "[{}] {}", stage.name(), args);
    }
    INIT_LOG.record(stage, is_error, args);
}

/// Log an error message to the ring buffer
pub fn error_log(stage: InitStage, msg: &str) {
    forward(stage, true, format_args!("{}", msg));
}

/// Log a debug/info message to the ring buffer
pub fn debug_log(stage: InitStage, msg: &str) {
    forward(stage, false, format_args!("{}", msg));
}

/// Log a formatted debug line, e.g.
/// `debug_logf(InitStage::ModeScan, format_args!("mode 0x{:04x}", mode))`.
pub fn debug_logf(stage: InitStage, args: fmt::Arguments<'_>) {
    forward(stage, false, args);
}

/// Log a formatted error line.
pub fn error_logf(stage: InitStage, args: fmt::Arguments<'_>) {
    forward(stage, true, args);
}

/// Pop the oldest entry from the init log
pub fn error_log_pop() -> Option<ErrorLogEntry> {
    INIT_LOG.pop()
}

/// Check how many entries are available to read
pub fn error_log_available() -> usize {
    INIT_LOG.available()
}

/// Get total number of entries ever written
pub fn error_log_count() -> usize {
    INIT_LOG.count()
}

/// Clear the init log
pub fn error_log_clear() {
    INIT_LOG.clear()
}
