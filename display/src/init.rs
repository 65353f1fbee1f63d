//! VESA console initialization orchestrator.
//!
//! The boot loader calls `VesaInit::initialize()` (or the code-returning
//! [`crate::init`]) once and either gets a ready console or an error.
//!
//! # Initialization Sequence
//!
//! 1. Query controller info (4F00h), check signature and version
//! 2. Walk the mode list (4F01h per mode) until a mode passes the policy
//! 3. Set the mode (4F02h); on failure fall back to text mode
//! 4. Download the ROM font (1130h) into the glyph table
//! 5. Size and initialize the text grid
//!
//! Each step's failure ends the sequence; nothing after it runs.
//!
//! # Error Handling
//!
//! Failures are logged to the init ring buffer for the boot UI. Use
//! `error_log_pop()` to retrieve entries after a failure.
//!
//! # Usage
//!
//! ```ignore
//! use vesacon_display::{DisplayContext, InitConfig, VesaInit, error_log_pop};
//!
//! let mut console = DisplayContext::new();
//! match VesaInit::initialize(&mut console, &mut firmware, &InitConfig::default()) {
//!     Ok(()) => {
//!         let mode = console.mode().unwrap();
//!         // hand mode.framebuffer(), console.font(), console.text() to the renderer
//!     }
//!     Err(e) => {
//!         while let Some(entry) = error_log_pop() {
//!             show(entry.message());
//!         }
//!     }
//! }
//! ```

use crate::activate::ModeActivator;
use crate::config::InitConfig;
use crate::context::{DisplayContext, InitState};
use crate::enumerate::ModeEnumerator;
use crate::error::{VesaInitError, VesaInitResult};
use crate::filter::ModePolicy;
use crate::font::FontLoader;
use crate::grid::{GridGeometry, TextCell, TextGrid};
use crate::ring_buffer::{debug_log, error_log, InitStage};
use crate::vbe::Firmware;

/// VESA console initialization orchestrator.
pub struct VesaInit;

impl VesaInit {
    /// Perform complete console initialization.
    ///
    /// Clears `ctx`, runs the sequence and leaves `ctx` in `Done` or
    /// `Failed(error)`. State published before a failure (for instance the
    /// active mode when the font is missing) stays readable.
    pub fn initialize<F: Firmware + ?Sized>(
        ctx: &mut DisplayContext,
        fw: &mut F,
        config: &InitConfig,
    ) -> VesaInitResult<()> {
        ctx.reset();
        debug_log(InitStage::General, "Starting VESA console initialization");

        match Self::run(ctx, fw, config) {
            Ok(()) => {
                ctx.advance(InitState::Done);
                debug_log(InitStage::General, "Ready!");
                Ok(())
            }
            Err(e) => {
                ctx.fail(e);
                Err(e)
            }
        }
    }

    fn run<F: Firmware + ?Sized>(
        ctx: &mut DisplayContext,
        fw: &mut F,
        config: &InitConfig,
    ) -> VesaInitResult<()> {
        // Step 1: controller info
        let mut modes = ModeEnumerator::probe(&mut *fw, config.min_version)?;
        let general = *modes.general_info();
        ctx.advance(InitState::GeneralInfoQueried);

        // Step 2: first acceptable mode
        let policy = ModePolicy::from_config(config);
        let mode = policy.select(&mut modes)?;
        drop(modes);
        ctx.advance(InitState::ModeSelected);

        // Step 3: switch
        let active = ModeActivator::activate(&mut *fw, general, mode)?;
        ctx.set_mode(active);
        ctx.advance(InitState::ModeActivated);

        // Step 4: font
        FontLoader::load(&mut *fw, config.font, ctx.font_mut())?;
        ctx.advance(InitState::FontLoaded);

        // Step 5: text grid
        let geometry = match GridGeometry::compute(
            active.width(),
            active.height(),
            ctx.font().height(),
            config.border_px,
        ) {
            Some(g) => g,
            None => {
                error_log(InitStage::TextGrid, "Font height is zero");
                return Err(VesaInitError::FontUnavailable);
            }
        };
        let grid = TextGrid::new(geometry, TextCell::blank(config.text_attr))?;
        ctx.set_text(grid);
        ctx.advance(InitState::TextGridReady);

        Ok(())
    }
}
