//! Vesacon Display Crate
//!
//! Brings up a VBE 2.0 linear framebuffer mode from pre-OS firmware and
//! prepares the glyph table and character grid of a text overlay.
//! Rendering itself is left to the caller.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │        VesaInit::initialize / init()        │
//! │   state machine, outcome codes, init log    │
//! └─────────────────────────────────────────────┘
//!          │            │            │
//!          ▼            ▼            ▼
//! ┌──────────────┐ ┌──────────┐ ┌────────────┐
//! │ModeEnumerator│ │FontLoader│ │  TextGrid  │
//! │ + ModePolicy │ │GlyphTable│ │ (geometry) │
//! │ModeActivator │ └────┬─────┘ └────────────┘
//! └──────┬───────┘      │
//!        ▼              ▼
//! ┌─────────────────────────────────────────────┐
//! │  vbe::Firmware  (INT 10h gateway + bounce)  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! All published state lives in a caller-owned [`DisplayContext`].

#![no_std]

extern crate alloc;

pub mod activate;
pub mod config;
pub mod context;
pub mod enumerate;
pub mod error;
pub mod filter;
pub mod font;
pub mod grid;
pub mod init;
pub mod ring_buffer;
pub mod types;
pub mod vbe;

pub use activate::{ActivationResult, ModeActivator};
pub use config::InitConfig;
pub use context::{DisplayContext, InitState};
pub use enumerate::ModeEnumerator;
pub use error::{outcome_code, VesaInitError, VesaInitResult, INIT_OK};
pub use filter::{ModePolicy, Rejection};
pub use font::{FontLoader, GlyphTable, FONT_MAX_CHARS, FONT_MAX_HEIGHT, FONT_WIDTH};
pub use grid::{GridGeometry, Shadow, TextCell, TextGrid};
pub use init::VesaInit;
pub use ring_buffer::{
    error_log_available, error_log_clear, error_log_count, error_log_pop, ErrorLogEntry,
    InitStage,
};
pub use types::{FramebufferInfo, PixelFormat};
pub use vbe::Firmware;

/// Initialization entry point.
///
/// Runs the whole sequence against `fw` and returns the outcome code:
/// 0 on success, otherwise [`VesaInitError::code`] of the failing step.
pub fn init<F: Firmware + ?Sized>(ctx: &mut DisplayContext, fw: &mut F, config: &InitConfig) -> i32 {
    outcome_code(&VesaInit::initialize(ctx, fw, config))
}
