//! VBE controller and mode information blocks.
//!
//! Both blocks are decoded field by field out of the bounce region into
//! owned values. Nothing here keeps a reference into firmware memory: the
//! next call is free to overwrite the region.

use bitflags::bitflags;

use super::regs::FarPtr;

/// Signature firmware writes back into a valid controller info block.
pub const VESA_MAGIC: [u8; 4] = *b"VESA";

/// Signature preloaded by the caller to request the VBE 2.0 extended block.
pub const VBE2_MAGIC: [u8; 4] = *b"VBE2";

/// Terminator of the firmware mode-number list.
pub const MODE_LIST_END: u16 = 0xFFFF;

#[inline]
fn le16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

#[inline]
fn le32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Controller information (VBE function 00h).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneralInfo {
    /// `VESA` on success.
    pub signature: [u8; 4],
    /// BCD version, 0x0200 for VBE 2.0.
    pub version: u16,
    pub oem_string: FarPtr,
    pub capabilities: u32,
    /// Far pointer to the 0xFFFF-terminated list of mode numbers.
    pub video_mode_ptr: FarPtr,
    /// Video memory in 64 KiB units.
    pub total_memory: u16,
    pub oem_software_rev: u16,
    pub oem_vendor_name: FarPtr,
    pub oem_product_name: FarPtr,
    pub oem_product_rev: FarPtr,
}

impl GeneralInfo {
    /// Size of the block firmware fills in.
    pub const SIZE: usize = 512;

    /// Decode from a bounce-region slice. `None` if the slice is short.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            signature: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: le16(bytes, 4),
            oem_string: FarPtr::from_raw(le32(bytes, 6)),
            capabilities: le32(bytes, 10),
            video_mode_ptr: FarPtr::from_raw(le32(bytes, 14)),
            total_memory: le16(bytes, 18),
            oem_software_rev: le16(bytes, 20),
            oem_vendor_name: FarPtr::from_raw(le32(bytes, 22)),
            oem_product_name: FarPtr::from_raw(le32(bytes, 26)),
            oem_product_rev: FarPtr::from_raw(le32(bytes, 30)),
        })
    }

    /// Prepare a request block: clear it and preload the `VBE2` signature.
    pub fn write_request(bytes: &mut [u8]) {
        let len = bytes.len().min(Self::SIZE);
        bytes[..len].fill(0);
        if len >= 4 {
            bytes[..4].copy_from_slice(&VBE2_MAGIC);
        }
    }

    pub fn has_vesa_signature(&self) -> bool {
        self.signature == VESA_MAGIC
    }

    /// Version as (major, minor).
    pub fn version_pair(&self) -> (u8, u8) {
        ((self.version >> 8) as u8, self.version as u8)
    }

    /// Total video memory in bytes.
    pub fn total_memory_bytes(&self) -> usize {
        self.total_memory as usize * 64 * 1024
    }
}

bitflags! {
    /// Mode attribute word of the mode info block.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModeAttributes: u16 {
        /// Mode supported by the present hardware configuration.
        const SUPPORTED = 0x0001;
        const EXTENDED_INFO = 0x0002;
        const BIOS_OUTPUT = 0x0004;
        /// Color mode (clear = monochrome).
        const COLOR = 0x0008;
        /// Graphics mode (clear = text).
        const GRAPHICS = 0x0010;
        const NOT_VGA_COMPATIBLE = 0x0020;
        const NO_WINDOWED_MEMORY = 0x0040;
        /// Linear framebuffer available.
        const LINEAR_FRAMEBUFFER = 0x0080;
        const DOUBLE_SCAN = 0x0100;
        const INTERLACED = 0x0200;
        const TRIPLE_BUFFER = 0x0400;
        const STEREOSCOPIC = 0x0800;
        const DUAL_DISPLAY_START = 0x1000;
    }
}

bitflags! {
    /// Flag bits OR'ed into the mode number of a set-mode request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SetModeFlags: u16 {
        /// Use the linear framebuffer instead of banked windows.
        const LINEAR_FRAMEBUFFER = 0x4000;
        /// Do not clear display memory on the switch.
        const PRESERVE_MEMORY = 0x8000;
    }
}

/// Memory model byte of the mode info block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryLayout {
    Text,
    Cga,
    Hercules,
    Planar,
    PackedPixel,
    NonChain4,
    DirectColor,
    Yuv,
    Other(u8),
}

impl MemoryLayout {
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Text,
            1 => Self::Cga,
            2 => Self::Hercules,
            3 => Self::Planar,
            4 => Self::PackedPixel,
            5 => Self::NonChain4,
            6 => Self::DirectColor,
            7 => Self::Yuv,
            other => Self::Other(other),
        }
    }

    pub const fn code(&self) -> u8 {
        match self {
            Self::Text => 0,
            Self::Cga => 1,
            Self::Hercules => 2,
            Self::Planar => 3,
            Self::PackedPixel => 4,
            Self::NonChain4 => 5,
            Self::DirectColor => 6,
            Self::Yuv => 7,
            Self::Other(code) => *code,
        }
    }
}

/// Mode information (VBE function 01h).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeInfo {
    /// Mode number this block was queried for. Not part of the firmware
    /// block; filled in by the caller.
    pub mode: u16,
    pub attributes: ModeAttributes,
    /// Bytes per scan line (banked access).
    pub bytes_per_line: u16,
    pub h_res: u16,
    pub v_res: u16,
    pub char_width: u8,
    pub char_height: u8,
    pub planes: u8,
    pub bpp: u8,
    pub banks: u8,
    pub memory_layout: MemoryLayout,
    pub bank_size: u8,
    pub image_pages: u8,
    pub red_mask: u8,
    pub red_pos: u8,
    pub green_mask: u8,
    pub green_pos: u8,
    pub blue_mask: u8,
    pub blue_pos: u8,
    pub reserved_mask: u8,
    pub reserved_pos: u8,
    pub direct_color_info: u8,
    /// Physical address of the linear framebuffer.
    pub lfb_ptr: u32,
    pub offscreen_ptr: u32,
    pub offscreen_size: u16,
    /// Bytes per scan line in linear modes (VBE 3.0+).
    pub lin_bytes_per_line: u16,
}

impl ModeInfo {
    /// Size of the block firmware fills in.
    pub const SIZE: usize = 256;

    /// Decode from a bounce-region slice. `None` if the slice is short.
    pub fn parse(mode: u16, bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            mode,
            attributes: ModeAttributes::from_bits_retain(le16(bytes, 0)),
            bytes_per_line: le16(bytes, 16),
            h_res: le16(bytes, 18),
            v_res: le16(bytes, 20),
            char_width: bytes[22],
            char_height: bytes[23],
            planes: bytes[24],
            bpp: bytes[25],
            banks: bytes[26],
            memory_layout: MemoryLayout::from_code(bytes[27]),
            bank_size: bytes[28],
            image_pages: bytes[29],
            red_mask: bytes[31],
            red_pos: bytes[32],
            green_mask: bytes[33],
            green_pos: bytes[34],
            blue_mask: bytes[35],
            blue_pos: bytes[36],
            reserved_mask: bytes[37],
            reserved_pos: bytes[38],
            direct_color_info: bytes[39],
            lfb_ptr: le32(bytes, 40),
            offscreen_ptr: le32(bytes, 44),
            offscreen_size: le16(bytes, 48),
            lin_bytes_per_line: le16(bytes, 50),
        })
    }

    /// Size of the visible framebuffer in bytes.
    pub fn framebuffer_size(&self) -> usize {
        self.bytes_per_line as usize * self.v_res as usize
    }
}
