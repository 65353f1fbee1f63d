//! VBE controller probe and mode list walk.

use crate::error::{VesaInitError, VesaInitResult};
use crate::ring_buffer::{debug_logf, error_log, error_logf, InitStage};
use crate::vbe::{call, CallError, Firmware, GeneralInfo, ModeInfo, BOUNCE_SIZE, MODE_LIST_END};

/// Lazy walk over the firmware's mode list.
///
/// Yields the decoded mode info of every listed mode whose 4F01h call
/// succeeds, in list order, and stops at the `0xFFFF` terminator. Each step
/// overwrites the bounce region, so the walk cannot be restarted; the
/// yielded values are owned copies.
pub struct ModeEnumerator<'a, F: Firmware + ?Sized> {
    fw: &'a mut F,
    info: GeneralInfo,
    /// Index of the next list entry.
    index: u32,
    done: bool,
}

impl<'a, F: Firmware + ?Sized> ModeEnumerator<'a, F> {
    /// Query controller info and validate it. Rejects a bounce region too
    /// small for both blocks, firmware without the `VESA` signature, and
    /// firmware older than `min_version`.
    pub fn probe(fw: &'a mut F, min_version: u16) -> VesaInitResult<Self> {
        // Both blocks must fit, or every mode query would fail later
        if fw.bounce().len() < BOUNCE_SIZE {
            error_logf(
                InitStage::GeneralInfo,
                format_args!("Bounce region {} bytes, need {}", fw.bounce().len(), BOUNCE_SIZE),
            );
            return Err(VesaInitError::FirmwareCallFailed);
        }

        let info = match call::controller_info(&mut *fw) {
            Ok(info) => info,
            Err(CallError::Status(ax)) => {
                error_logf(
                    InitStage::GeneralInfo,
                    format_args!("4F00h failed, AX=0x{:04x}", ax),
                );
                return Err(VesaInitError::FirmwareCallFailed);
            }
            Err(CallError::BadBounce) => {
                error_log(InitStage::GeneralInfo, "Bounce region unusable");
                return Err(VesaInitError::FirmwareCallFailed);
            }
        };

        if !info.has_vesa_signature() {
            error_log(InitStage::GeneralInfo, "No VESA signature");
            return Err(VesaInitError::BadSignature);
        }
        if info.version < min_version {
            error_logf(
                InitStage::GeneralInfo,
                format_args!("VBE version 0x{:04x} too old", info.version),
            );
            return Err(VesaInitError::UnsupportedVersion);
        }

        let (major, minor) = info.version_pair();
        debug_logf(
            InitStage::GeneralInfo,
            format_args!(
                "VBE {}.{}, {} KiB video memory, mode list at {:04x}:{:04x}",
                major,
                minor,
                info.total_memory as u32 * 64,
                info.video_mode_ptr.segment,
                info.video_mode_ptr.offset
            ),
        );

        Ok(Self {
            fw,
            info,
            index: 0,
            done: false,
        })
    }

    /// Controller info the walk was started from.
    pub fn general_info(&self) -> &GeneralInfo {
        &self.info
    }

    /// Read the next raw list entry. `None` at the terminator or when the
    /// list runs off addressable memory.
    fn next_mode_number(&mut self) -> Option<u16> {
        if self.done {
            return None;
        }
        let entry = self
            .info
            .video_mode_ptr
            .offset_by(self.index * 2)
            .and_then(|ptr| self.fw.resolve(ptr, 2))
            .map(|b| u16::from_le_bytes([b[0], b[1]]));

        match entry {
            Some(MODE_LIST_END) => {
                self.done = true;
                None
            }
            Some(mode) => {
                self.index += 1;
                Some(mode)
            }
            None => {
                error_log(InitStage::ModeScan, "Mode list not addressable");
                self.done = true;
                None
            }
        }
    }
}

impl<F: Firmware + ?Sized> Iterator for ModeEnumerator<'_, F> {
    type Item = ModeInfo;

    fn next(&mut self) -> Option<ModeInfo> {
        loop {
            let mode = self.next_mode_number()?;
            debug_logf(InitStage::ModeScan, format_args!("Found mode: 0x{:04x}", mode));

            match call::mode_info(&mut *self.fw, mode) {
                Ok(mi) => {
                    debug_logf(
                        InitStage::ModeScan,
                        format_args!(
                            "mode_attr 0x{:04x}, h_res = {:4}, v_res = {:4}, bpp = {:2}, layout = {} ({},{},{})",
                            mi.attributes.bits(),
                            mi.h_res,
                            mi.v_res,
                            mi.bpp,
                            mi.memory_layout.code(),
                            mi.red_pos,
                            mi.green_pos,
                            mi.blue_pos
                        ),
                    );
                    return Some(mi);
                }
                Err(_) => {
                    debug_logf(
                        InitStage::ModeScan,
                        format_args!("4F01h failed for mode 0x{:04x}, skipped", mode),
                    );
                }
            }
        }
    }
}
