//! Mode switch with text-mode fallback.

use crate::error::{VesaInitError, VesaInitResult};
use crate::ring_buffer::{debug_logf, error_logf, InitStage};
use crate::types::{FramebufferInfo, PixelFormat};
use crate::vbe::{call, CallError, Firmware, GeneralInfo, ModeInfo, SetModeFlags};

/// Flags forced onto every set-mode request.
pub const SET_MODE_FLAGS: SetModeFlags =
    SetModeFlags::PRESERVE_MEMORY.union(SetModeFlags::LINEAR_FRAMEBUFFER);

/// The established mode, retained for the rest of the boot session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationResult {
    pub general: GeneralInfo,
    pub mode: ModeInfo,
}

impl ActivationResult {
    /// Mode number that was set.
    pub fn mode_number(&self) -> u16 {
        self.mode.mode
    }

    /// Physical address of the linear framebuffer.
    pub fn framebuffer(&self) -> u32 {
        self.mode.lfb_ptr
    }

    pub fn width(&self) -> u16 {
        self.mode.h_res
    }

    pub fn height(&self) -> u16 {
        self.mode.v_res
    }

    /// Bytes per scan line in the linear framebuffer. VBE 3.0 firmware
    /// reports it separately from the banked figure; older firmware only
    /// has the banked one.
    pub fn stride(&self) -> u16 {
        match self.mode.lin_bytes_per_line {
            n if n != 0 && self.general.version >= 0x0300 => n,
            _ => self.mode.bytes_per_line,
        }
    }

    /// Framebuffer description for the renderer.
    pub fn framebuffer_info(&self) -> FramebufferInfo {
        let stride = match self.stride() {
            0 => self.mode.h_res as u32 * (self.mode.bpp as u32 / 8),
            n => n as u32,
        };
        FramebufferInfo {
            base: self.mode.lfb_ptr as u64,
            size: stride as usize * self.mode.v_res as usize,
            width: self.mode.h_res as u32,
            height: self.mode.v_res as u32,
            stride,
            format: PixelFormat::from_channel_positions(self.mode.red_pos, self.mode.blue_pos),
        }
    }
}

/// Issues the set-mode request for the accepted mode.
pub struct ModeActivator;

impl ModeActivator {
    /// Switch to `mode`. On failure the firmware is put back into 80x25
    /// text mode before `ModeSetFailed` is returned, so the terminal stays
    /// usable.
    pub fn activate<F: Firmware + ?Sized>(
        fw: &mut F,
        general: GeneralInfo,
        mode: ModeInfo,
    ) -> VesaInitResult<ActivationResult> {
        if let Err(e) = call::set_mode(fw, mode.mode, SET_MODE_FLAGS) {
            let ax = match e {
                CallError::Status(ax) => ax,
                CallError::BadBounce => 0,
            };
            error_logf(
                InitStage::ModeSet,
                format_args!("4F02h failed for mode 0x{:04x}, AX=0x{:04x}", mode.mode, ax),
            );
            call::set_text_mode(fw);
            return Err(VesaInitError::ModeSetFailed);
        }

        debug_logf(
            InitStage::ModeSet,
            format_args!("Mode set, now drawing at {:#010x}", mode.lfb_ptr),
        );
        Ok(ActivationResult { general, mode })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_mode_flags() {
        assert_eq!(SET_MODE_FLAGS.bits(), 0xC000);
    }

    fn activation(version: u16, banked: u16, linear: u16, rgb: (u8, u8)) -> ActivationResult {
        let mut general = [0u8; GeneralInfo::SIZE];
        general[4..6].copy_from_slice(&version.to_le_bytes());
        let mut block = [0u8; ModeInfo::SIZE];
        block[16..18].copy_from_slice(&banked.to_le_bytes());
        block[18..20].copy_from_slice(&640u16.to_le_bytes());
        block[20..22].copy_from_slice(&480u16.to_le_bytes());
        block[25] = 32;
        block[27] = 6;
        block[32] = rgb.0;
        block[36] = rgb.1;
        block[40..44].copy_from_slice(&0xFD00_0000u32.to_le_bytes());
        block[50..52].copy_from_slice(&linear.to_le_bytes());
        ActivationResult {
            general: GeneralInfo::parse(&general).unwrap(),
            mode: ModeInfo::parse(0x118, &block).unwrap(),
        }
    }

    #[test]
    fn test_framebuffer_info() {
        let active = activation(0x0200, 0, 0, (16, 0));

        let fb = active.framebuffer_info();
        assert!(fb.is_valid());
        assert_eq!(fb.base, 0xFD00_0000);
        assert_eq!(fb.stride, 2560);
        assert_eq!(fb.size, 2560 * 480);
        assert_eq!(fb.format, PixelFormat::Bgrx);
        assert_eq!(active.mode_number(), 0x118);
    }

    #[test]
    fn test_vbe3_linear_stride_preferred() {
        let active = activation(0x0300, 2560, 4096, (16, 0));
        assert_eq!(active.stride(), 4096);
        let fb = active.framebuffer_info();
        assert_eq!(fb.stride, 4096);
        assert_eq!(fb.size, 4096 * 480);
    }

    #[test]
    fn test_linear_stride_ignored_before_vbe3() {
        let active = activation(0x0200, 2560, 4096, (16, 0));
        assert_eq!(active.stride(), 2560);
        assert_eq!(active.framebuffer_info().stride, 2560);
    }

    #[test]
    fn test_vbe3_zero_linear_stride_falls_back() {
        let active = activation(0x0300, 2560, 0, (16, 0));
        assert_eq!(active.stride(), 2560);
    }

    #[test]
    fn test_framebuffer_format_from_positions() {
        let active = activation(0x0300, 2560, 0, (0, 16));
        assert_eq!(active.framebuffer_info().format, PixelFormat::Rgbx);
    }
}
