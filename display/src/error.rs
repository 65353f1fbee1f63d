//! Console initialization errors.
//!
//! One variant per way graphics bring-up can fail. Every variant carries a
//! fixed numeric outcome code so a boot loader can report it without
//! linking the formatter.

use core::fmt;

/// Outcome code of a successful initialization.
pub const INIT_OK: i32 = 0;

/// Console initialization error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VesaInitError {
    /// Controller info call (4F00h) reported failure.
    FirmwareCallFailed,
    /// Controller info block did not carry the `VESA` signature.
    BadSignature,
    /// VBE revision below the configured minimum.
    UnsupportedVersion,
    /// Mode list exhausted without an acceptable mode.
    NoCompatibleMode,
    /// ROM font query returned no usable font.
    FontUnavailable,
    /// Text grid buffer could not be allocated.
    AllocationFailed,
    /// Set-mode call failed. Text mode fallback was issued.
    ModeSetFailed,
}

impl VesaInitError {
    /// Numeric outcome code returned by the init entry point.
    pub const fn code(&self) -> i32 {
        match self {
            Self::FirmwareCallFailed => 1,
            Self::BadSignature => 2,
            Self::UnsupportedVersion => 3,
            Self::NoCompatibleMode => 4,
            Self::FontUnavailable => 5,
            Self::AllocationFailed => 6,
            Self::ModeSetFailed => 9,
        }
    }

    /// Reverse of [`code`](Self::code). `None` for 0 and unknown codes.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::FirmwareCallFailed),
            2 => Some(Self::BadSignature),
            3 => Some(Self::UnsupportedVersion),
            4 => Some(Self::NoCompatibleMode),
            5 => Some(Self::FontUnavailable),
            6 => Some(Self::AllocationFailed),
            9 => Some(Self::ModeSetFailed),
            _ => None,
        }
    }

    /// Get a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            Self::FirmwareCallFailed => "VBE controller info call failed",
            Self::BadSignature => "VBE controller info has no VESA signature",
            Self::UnsupportedVersion => "VBE 2.0 or later not supported by firmware",
            Self::NoCompatibleMode => "No compatible linear framebuffer mode found",
            Self::FontUnavailable => "ROM font not available",
            Self::AllocationFailed => "Text grid allocation failed",
            Self::ModeSetFailed => "Failed to set video mode",
        }
    }
}

impl fmt::Display for VesaInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.description(), self.code())
    }
}

/// Result type for console initialization.
pub type VesaInitResult<T> = Result<T, VesaInitError>;

/// Collapse an init result into the entry point's outcome code.
pub fn outcome_code<T>(result: &VesaInitResult<T>) -> i32 {
    match result {
        Ok(_) => INIT_OK,
        Err(e) => e.code(),
    }
}
