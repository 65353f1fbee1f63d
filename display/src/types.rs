//! Hand-off types for the framebuffer renderer.
//!
//! `#[repr(C)]` so a loader can pass them on to a kernel unchanged.

/// Byte order of a 32-bit pixel in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PixelFormat {
    /// Red-Green-Blue-Reserved (RGBX), 8 bits each
    Rgbx = 0,
    /// Blue-Green-Red-Reserved (BGRX), 8 bits each: the 0x00RRGGBB word
    /// every accepted VBE mode uses
    Bgrx = 1,
}

impl PixelFormat {
    /// Byte order for a 32-bit direct color mode with the given red and
    /// blue field positions. Anything but red in the low byte is treated as
    /// the usual BGRX.
    pub fn from_channel_positions(red_pos: u8, blue_pos: u8) -> Self {
        match (red_pos, blue_pos) {
            (0, 16) => PixelFormat::Rgbx,
            _ => PixelFormat::Bgrx,
        }
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        PixelFormat::Bgrx
    }
}

/// Linear framebuffer description of the active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct FramebufferInfo {
    /// Physical base address of the framebuffer.
    pub base: u64,
    /// Total size of the visible framebuffer in bytes.
    pub size: usize,
    /// Visible width in pixels.
    pub width: u32,
    /// Visible height in pixels.
    pub height: u32,
    /// Stride in bytes (may be > width * 4 due to padding).
    pub stride: u32,
    /// Pixel format.
    pub format: PixelFormat,
}

impl FramebufferInfo {
    /// Check if framebuffer info is valid.
    pub fn is_valid(&self) -> bool {
        self.base != 0 && self.width > 0 && self.height > 0 && self.stride > 0
    }
}
