//! Console initialization configuration.
//!
//! Target mode and text overlay policy for the init sequence.

use crate::vbe::RomFont;

/// Lowest VBE revision with linear framebuffer support.
pub const VBE_MIN_VERSION: u16 = 0x0200;

/// Light gray on black.
pub const DEFAULT_TEXT_ATTR: u8 = 0x07;

/// Pixel border the syslinux console keeps around its text area.
pub const SYSLINUX_BORDER_PX: u16 = 8;

/// Console initialization configuration.
#[derive(Debug, Clone)]
pub struct InitConfig {
    /// Required horizontal resolution.
    pub width: u16,
    /// Required vertical resolution.
    pub height: u16,
    /// Required bits per pixel.
    pub bpp: u8,
    /// Minimum acceptable VBE version (BCD).
    pub min_version: u16,
    /// ROM font to download.
    pub font: RomFont,
    /// Pixel border excluded from the text area on every edge.
    pub border_px: u16,
    /// Attribute every text cell starts with.
    pub text_attr: u8,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            bpp: 32,
            min_version: VBE_MIN_VERSION,
            font: RomFont::Vga8x16,
            border_px: 0,
            text_attr: DEFAULT_TEXT_ATTR,
        }
    }
}

impl InitConfig {
    /// 640x480x32 with the syslinux 8 px text border.
    pub fn syslinux() -> Self {
        Self {
            border_px: SYSLINUX_BORDER_PX,
            ..Default::default()
        }
    }

    /// Set target resolution and depth.
    pub fn resolution(mut self, width: u16, height: u16, bpp: u8) -> Self {
        self.width = width;
        self.height = height;
        self.bpp = bpp;
        self
    }

    /// Set minimum VBE version.
    pub fn min_version(mut self, version: u16) -> Self {
        self.min_version = version;
        self
    }

    /// Set ROM font variant.
    pub fn font(mut self, font: RomFont) -> Self {
        self.font = font;
        self
    }

    /// Set text area border in pixels.
    pub fn border(mut self, px: u16) -> Self {
        self.border_px = px;
        self
    }

    /// Set initial text attribute.
    pub fn attribute(mut self, attr: u8) -> Self {
        self.text_attr = attr;
        self
    }
}
