//! Typed INT 10h requests.
//!
//! One function per firmware operation the console needs. Each builds the
//! register block, issues exactly one call through the gateway and decodes
//! the reply. Raw register packing stays inside this file.

use super::info::{GeneralInfo, ModeInfo, SetModeFlags};
use super::regs::{FarPtr, Registers};
use super::Firmware;

/// Video services interrupt vector.
pub const VIDEO_INT: u8 = 0x10;

/// AX value of a successful VBE call (AL = 4Fh supported, AH = 0 success).
pub const VBE_SUCCESS: u16 = 0x004F;

pub const VBE_GET_CONTROLLER_INFO: u16 = 0x4F00;
pub const VBE_GET_MODE_INFO: u16 = 0x4F01;
pub const VBE_SET_MODE: u16 = 0x4F02;
pub const VGA_GET_FONT_INFO: u16 = 0x1130;

/// AH=00h set mode, AL=03h: 80x25 color text.
pub const VGA_TEXT_MODE_80X25: u16 = 0x0003;

/// Bounce region slot of the controller info block.
pub const GENERAL_INFO_OFFSET: usize = 0;

/// Bounce region slot of the mode info block. Kept clear of the controller
/// block because the mode list frequently lives inside its reserved area.
pub const MODE_INFO_OFFSET: usize = GeneralInfo::SIZE;

/// Minimum bounce region a firmware implementation must provide.
pub const BOUNCE_SIZE: usize = GeneralInfo::SIZE + ModeInfo::SIZE;

/// Why a typed request did not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallError {
    /// Firmware returned a status other than `VBE_SUCCESS` (raw AX).
    Status(u16),
    /// Bounce region too small or not addressable by firmware.
    BadBounce,
}

/// ROM font variants selectable through INT 10h/1130h (BH).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RomFont {
    Vga8x14 = 0x02,
    Vga8x8 = 0x03,
    Vga8x16 = 0x06,
}

impl RomFont {
    /// Glyph height in pixel rows.
    pub const fn height(&self) -> usize {
        match self {
            Self::Vga8x14 => 14,
            Self::Vga8x8 => 8,
            Self::Vga8x16 => 16,
        }
    }

    pub const fn selector(&self) -> u8 {
        *self as u8
    }
}

fn bounce_slot<F: Firmware + ?Sized>(fw: &F, offset: usize, len: usize) -> Result<FarPtr, CallError> {
    if fw.bounce().len() < offset + len {
        return Err(CallError::BadBounce);
    }
    fw.bounce_ptr()
        .offset_by(offset as u32)
        .ok_or(CallError::BadBounce)
}

/// VBE 00h: return controller information.
pub fn controller_info<F: Firmware + ?Sized>(fw: &mut F) -> Result<GeneralInfo, CallError> {
    let ptr = bounce_slot(fw, GENERAL_INFO_OFFSET, GeneralInfo::SIZE)?;
    GeneralInfo::write_request(
        &mut fw.bounce_mut()[GENERAL_INFO_OFFSET..GENERAL_INFO_OFFSET + GeneralInfo::SIZE],
    );

    let mut regs = Registers::new();
    regs.set_ax(VBE_GET_CONTROLLER_INFO);
    regs.set_es_di(ptr);
    let out = fw.intcall(VIDEO_INT, &regs);
    if out.ax() != VBE_SUCCESS {
        return Err(CallError::Status(out.ax()));
    }

    GeneralInfo::parse(&fw.bounce()[GENERAL_INFO_OFFSET..]).ok_or(CallError::BadBounce)
}

/// VBE 01h: return mode information for `mode`.
pub fn mode_info<F: Firmware + ?Sized>(fw: &mut F, mode: u16) -> Result<ModeInfo, CallError> {
    let ptr = bounce_slot(fw, MODE_INFO_OFFSET, ModeInfo::SIZE)?;

    let mut regs = Registers::new();
    regs.set_ax(VBE_GET_MODE_INFO);
    regs.set_cx(mode);
    regs.set_es_di(ptr);
    let out = fw.intcall(VIDEO_INT, &regs);
    if out.ax() != VBE_SUCCESS {
        return Err(CallError::Status(out.ax()));
    }

    ModeInfo::parse(mode, &fw.bounce()[MODE_INFO_OFFSET..]).ok_or(CallError::BadBounce)
}

/// VBE 02h: set `mode` with the given request flags.
pub fn set_mode<F: Firmware + ?Sized>(
    fw: &mut F,
    mode: u16,
    flags: SetModeFlags,
) -> Result<(), CallError> {
    let mut regs = Registers::new();
    regs.set_ax(VBE_SET_MODE);
    regs.set_bx(mode | flags.bits());
    let out = fw.intcall(VIDEO_INT, &regs);
    if out.ax() != VBE_SUCCESS {
        return Err(CallError::Status(out.ax()));
    }
    Ok(())
}

/// INT 10h/00h: return to standard 80x25 text mode. There is no status
/// to check.
pub fn set_text_mode<F: Firmware + ?Sized>(fw: &mut F) {
    let mut regs = Registers::new();
    regs.set_ax(VGA_TEXT_MODE_80X25);
    let _ = fw.intcall(VIDEO_INT, &regs);
}

/// INT 10h/1130h: far pointer to a ROM font. Firmware reports no status;
/// callers validate the pointer.
pub fn rom_font<F: Firmware + ?Sized>(fw: &mut F, font: RomFont) -> FarPtr {
    let mut regs = Registers::new();
    regs.set_ax(VGA_GET_FONT_INFO);
    regs.set_bh(font.selector());
    let out = fw.intcall(VIDEO_INT, &regs);
    out.es_bp()
}
