//! ROM font download and glyph table.
//!
//! The firmware font is packed: `height` bytes per glyph, glyphs back to
//! back. The glyph table stores every glyph at a fixed `FONT_MAX_HEIGHT`
//! stride with the rows past the source height zeroed, so the renderer
//! never needs to know which ROM variant was loaded.

use crate::ring_buffer::{debug_logf, error_log, InitStage};
use crate::vbe::{call, Firmware, RomFont};
use crate::error::{VesaInitError, VesaInitResult};

/// Glyphs in a ROM font.
pub const FONT_MAX_CHARS: usize = 256;

/// Tallest glyph the table can hold.
pub const FONT_MAX_HEIGHT: usize = 32;

/// Glyph width in pixels (one byte per row).
pub const FONT_WIDTH: usize = 8;

/// Fixed-stride glyph table plus the height of the loaded font.
///
/// Glyph `n` occupies bytes `n * FONT_MAX_HEIGHT..(n + 1) * FONT_MAX_HEIGHT`,
/// one byte per row, MSB is the leftmost pixel.
#[derive(Clone)]
pub struct GlyphTable {
    data: [u8; FONT_MAX_CHARS * FONT_MAX_HEIGHT],
    height: usize,
}

impl GlyphTable {
    /// Empty table (no font loaded, height 0).
    pub const fn new() -> Self {
        Self {
            data: [0u8; FONT_MAX_CHARS * FONT_MAX_HEIGHT],
            height: 0,
        }
    }

    /// Height of the loaded font in pixel rows (0 before loading).
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_loaded(&self) -> bool {
        self.height != 0
    }

    /// Rows of the glyph for character code `ch` (`FONT_MAX_HEIGHT` bytes).
    pub fn glyph(&self, ch: u8) -> &[u8] {
        let start = ch as usize * FONT_MAX_HEIGHT;
        &self.data[start..start + FONT_MAX_HEIGHT]
    }

    /// The whole table.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Replace the table from a packed font of `height` rows per glyph.
    ///
    /// `src` must hold at least `FONT_MAX_CHARS * height` bytes and
    /// `height` must be in `1..=FONT_MAX_HEIGHT`; otherwise the table is
    /// left untouched and `false` is returned.
    pub fn unpack(&mut self, src: &[u8], height: usize) -> bool {
        if height == 0 || height > FONT_MAX_HEIGHT || src.len() < FONT_MAX_CHARS * height {
            return false;
        }
        let slots = self.data.chunks_exact_mut(FONT_MAX_HEIGHT);
        for (dst, rows) in slots.zip(src.chunks_exact(height)) {
            dst[..height].copy_from_slice(rows);
            dst[height..].fill(0);
        }
        self.height = height;
        true
    }
}

impl Default for GlyphTable {
    fn default() -> Self {
        Self::new()
    }
}

/// ROM font loader.
pub struct FontLoader;

impl FontLoader {
    /// Query the firmware for `font` and unpack it into `table`.
    pub fn load<F: Firmware + ?Sized>(
        fw: &mut F,
        font: RomFont,
        table: &mut GlyphTable,
    ) -> VesaInitResult<()> {
        let ptr = call::rom_font(fw, font);
        if ptr.is_null() {
            error_log(InitStage::Font, "Firmware returned null font pointer");
            return Err(VesaInitError::FontUnavailable);
        }

        let height = font.height();
        let src = match fw.resolve(ptr, FONT_MAX_CHARS * height) {
            Some(src) => src,
            None => {
                error_log(InitStage::Font, "Font pointer not addressable");
                return Err(VesaInitError::FontUnavailable);
            }
        };

        if !table.unpack(src, height) {
            error_log(InitStage::Font, "Font data unusable");
            return Err(VesaInitError::FontUnavailable);
        }

        debug_logf(
            InitStage::Font,
            format_args!("Loaded 8x{} ROM font from {:04x}:{:04x}", height, ptr.segment, ptr.offset),
        );
        Ok(())
    }
}
