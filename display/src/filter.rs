//! Mode acceptance policy.
//!
//! Candidates are checked in list order against three predicate classes.
//! The first candidate passing all of them wins; later ones are never
//! looked at, even if they would match just as well.

use crate::config::InitConfig;
use crate::error::{VesaInitError, VesaInitResult};
use crate::ring_buffer::{debug_logf, error_log, InitStage};
use crate::vbe::{MemoryLayout, ModeAttributes, ModeInfo};

/// Attribute bits every acceptable mode must carry (0x0099): supported by
/// the hardware, color, graphics, linear framebuffer.
pub const REQUIRED_ATTRIBUTES: ModeAttributes = ModeAttributes::SUPPORTED
    .union(ModeAttributes::COLOR)
    .union(ModeAttributes::GRAPHICS)
    .union(ModeAttributes::LINEAR_FRAMEBUFFER);

/// Channel bit positions accepted for direct-color modes: 0x00RRGGBB.
pub const DIRECT_COLOR_POSITIONS: (u8, u8, u8) = (16, 8, 0);

/// Why a candidate was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// At least one required attribute bit is clear.
    Attributes(ModeAttributes),
    /// Resolution or depth differs from the target.
    Geometry,
    /// Neither packed pixel nor 0x00RRGGBB direct color.
    Layout,
}

/// Target mode and required attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModePolicy {
    pub width: u16,
    pub height: u16,
    pub bpp: u8,
    pub required: ModeAttributes,
}

impl ModePolicy {
    pub const fn new(width: u16, height: u16, bpp: u8) -> Self {
        Self {
            width,
            height,
            bpp,
            required: REQUIRED_ATTRIBUTES,
        }
    }

    pub fn from_config(config: &InitConfig) -> Self {
        Self::new(config.width, config.height, config.bpp)
    }

    /// Run the predicates in order; the first failing one is reported.
    pub fn check(&self, mi: &ModeInfo) -> Result<(), Rejection> {
        if !mi.attributes.contains(self.required) {
            return Err(Rejection::Attributes(self.required.difference(mi.attributes)));
        }
        if mi.h_res != self.width || mi.v_res != self.height || mi.bpp != self.bpp {
            return Err(Rejection::Geometry);
        }
        match mi.memory_layout {
            MemoryLayout::PackedPixel => Ok(()),
            MemoryLayout::DirectColor
                if (mi.red_pos, mi.green_pos, mi.blue_pos) == DIRECT_COLOR_POSITIONS =>
            {
                Ok(())
            }
            _ => Err(Rejection::Layout),
        }
    }

    pub fn accepts(&self, mi: &ModeInfo) -> bool {
        self.check(mi).is_ok()
    }

    /// Take the first acceptable candidate, consuming the sequence only up
    /// to it.
    pub fn select<I>(&self, candidates: I) -> VesaInitResult<ModeInfo>
    where
        I: IntoIterator<Item = ModeInfo>,
    {
        for mi in candidates {
            match self.check(&mi) {
                Ok(()) => {
                    debug_logf(
                        InitStage::ModeFilter,
                        format_args!(
                            "Accepted mode 0x{:04x}: {}x{}x{}",
                            mi.mode, mi.h_res, mi.v_res, mi.bpp
                        ),
                    );
                    return Ok(mi);
                }
                Err(reason) => {
                    debug_logf(
                        InitStage::ModeFilter,
                        format_args!("Rejected mode 0x{:04x}: {:?}", mi.mode, reason),
                    );
                }
            }
        }

        error_log(InitStage::ModeFilter, "No mode found");
        Err(VesaInitError::NoCompatibleMode)
    }
}

impl Default for ModePolicy {
    fn default() -> Self {
        Self::new(640, 480, 32)
    }
}
