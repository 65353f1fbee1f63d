//! Common test utilities and a scripted VBE firmware

#![allow(dead_code)]

use vesacon_display::vbe::call::{BOUNCE_SIZE, VBE_SUCCESS};
use vesacon_display::vbe::{FarPtr, Firmware, Registers};

/// Linear address of the bounce region in the fake low memory.
pub const BOUNCE_AT: u32 = 0x9_0000;

/// Linear address the mode list is written to.
pub const MODE_LIST_AT: u32 = 0x2000;

/// ROM font location (C000:0000).
pub const FONT_AT: FarPtr = FarPtr::new(0xC000, 0x0000);

/// Mode info block for a mode with the given fields; everything else zero.
pub fn mode_block(h_res: u16, v_res: u16, bpp: u8, attrs: u16, layout: u8, rgb: (u8, u8, u8)) -> Vec<u8> {
    let mut block = vec![0u8; 256];
    block[0..2].copy_from_slice(&attrs.to_le_bytes());
    let line = h_res as u32 * (bpp as u32 / 8);
    block[16..18].copy_from_slice(&(line as u16).to_le_bytes());
    block[18..20].copy_from_slice(&h_res.to_le_bytes());
    block[20..22].copy_from_slice(&v_res.to_le_bytes());
    block[22] = 8;
    block[23] = 16;
    block[24] = 1;
    block[25] = bpp;
    block[27] = layout;
    block[32] = rgb.0;
    block[34] = rgb.1;
    block[36] = rgb.2;
    block[40..44].copy_from_slice(&0xFD00_0000u32.to_le_bytes());
    block
}

/// 640x480x32 packed pixel with all required attributes.
pub fn good_mode() -> Vec<u8> {
    mode_block(640, 480, 32, 0x009B, 4, (0, 0, 0))
}

/// Firmware stand-in backed by a 1 MiB vector.
pub struct MockBios {
    pub memory: Vec<u8>,
    /// Status AX of 4F00h.
    pub general_status: u16,
    /// Signature written back by 4F00h.
    pub signature: [u8; 4],
    pub version: u16,
    /// (mode number, mode info block; `None` makes 4F01h fail)
    pub modes: Vec<(u16, Option<Vec<u8>>)>,
    pub set_mode_status: u16,
    /// ES:BP returned by 1130h.
    pub font_ptr: FarPtr,
    /// Every register block passed to `intcall`, in order.
    pub calls: Vec<Registers>,
    /// Bytes of the bounce region exposed to the caller.
    pub bounce_len: usize,
}

impl MockBios {
    /// VBE 2.0 firmware with the given mode list and a patterned 8x16 font.
    pub fn new(modes: Vec<(u16, Option<Vec<u8>>)>) -> Self {
        let mut bios = Self {
            memory: vec![0u8; 0x10_0000],
            general_status: VBE_SUCCESS,
            signature: *b"VESA",
            version: 0x0200,
            modes,
            set_mode_status: VBE_SUCCESS,
            font_ptr: FONT_AT,
            calls: Vec::new(),
            bounce_len: BOUNCE_SIZE,
        };
        bios.write_mode_list();
        bios.write_font(16);
        bios
    }

    /// Firmware advertising only the standard good mode 0x118.
    pub fn single_good_mode() -> Self {
        Self::new(vec![(0x118, Some(good_mode()))])
    }

    fn write_mode_list(&mut self) {
        let mut at = MODE_LIST_AT as usize;
        for (mode, _) in &self.modes {
            self.memory[at..at + 2].copy_from_slice(&mode.to_le_bytes());
            at += 2;
        }
        self.memory[at..at + 2].copy_from_slice(&0xFFFFu16.to_le_bytes());
    }

    /// Fill the ROM font area with a packed font of `height` rows.
    pub fn write_font(&mut self, height: usize) {
        let base = FONT_AT.linear() as usize;
        for i in 0..256 * height {
            self.memory[base + i] = Self::font_byte(i);
        }
    }

    /// Byte `i` of the packed test font.
    pub fn font_byte(i: usize) -> u8 {
        (i as u8).wrapping_mul(7) | 0x01
    }

    /// AX values of all calls issued so far.
    pub fn functions(&self) -> Vec<u16> {
        self.calls.iter().map(|r| r.ax()).collect()
    }

    /// Number of calls issued with function `ax`.
    pub fn count(&self, ax: u16) -> usize {
        self.calls.iter().filter(|r| r.ax() == ax).count()
    }

    /// Mode numbers passed to 4F01h, in order.
    pub fn mode_queries(&self) -> Vec<u16> {
        self.calls
            .iter()
            .filter(|r| r.ax() == 0x4F01)
            .map(|r| r.cx())
            .collect()
    }

    /// BX values passed to 4F02h.
    pub fn set_mode_requests(&self) -> Vec<u16> {
        self.calls
            .iter()
            .filter(|r| r.ax() == 0x4F02)
            .map(|r| r.bx())
            .collect()
    }

    fn es_di(regs: &Registers) -> usize {
        FarPtr::new(regs.es, regs.di()).linear() as usize
    }
}

impl Firmware for MockBios {
    fn intcall(&mut self, vector: u8, regs: &Registers) -> Registers {
        assert_eq!(vector, 0x10, "only video services are expected");
        self.calls.push(*regs);

        let mut out = *regs;
        match regs.ax() {
            0x4F00 => {
                let at = Self::es_di(regs);
                assert_eq!(&self.memory[at..at + 4], b"VBE2", "VBE2 request not preloaded");
                if self.general_status != VBE_SUCCESS {
                    out.set_ax(self.general_status);
                    return out;
                }
                self.memory[at..at + 4].copy_from_slice(&self.signature);
                self.memory[at + 4..at + 6].copy_from_slice(&self.version.to_le_bytes());
                let list = FarPtr::from_linear(MODE_LIST_AT).unwrap().to_raw();
                self.memory[at + 14..at + 18].copy_from_slice(&list.to_le_bytes());
                self.memory[at + 18..at + 20].copy_from_slice(&128u16.to_le_bytes());
                out.set_ax(VBE_SUCCESS);
            }
            0x4F01 => {
                let mode = regs.cx();
                let block = self
                    .modes
                    .iter()
                    .find(|(m, _)| *m == mode)
                    .and_then(|(_, b)| b.clone());
                match block {
                    Some(block) => {
                        let at = Self::es_di(regs);
                        self.memory[at..at + 256].copy_from_slice(&block);
                        out.set_ax(VBE_SUCCESS);
                    }
                    None => out.set_ax(0x014F),
                }
            }
            0x4F02 => out.set_ax(self.set_mode_status),
            0x1130 => {
                out.es = self.font_ptr.segment;
                out.set_bp(self.font_ptr.offset);
            }
            0x0003 => {}
            other => panic!("unexpected INT 10h function 0x{:04x}", other),
        }
        out
    }

    fn bounce_ptr(&self) -> FarPtr {
        FarPtr::from_linear(BOUNCE_AT).unwrap()
    }

    fn bounce(&self) -> &[u8] {
        &self.memory[BOUNCE_AT as usize..BOUNCE_AT as usize + self.bounce_len]
    }

    fn bounce_mut(&mut self) -> &mut [u8] {
        &mut self.memory[BOUNCE_AT as usize..BOUNCE_AT as usize + self.bounce_len]
    }

    fn resolve(&self, ptr: FarPtr, len: usize) -> Option<&[u8]> {
        let at = ptr.linear() as usize;
        self.memory.get(at..at.checked_add(len)?)
    }
}
