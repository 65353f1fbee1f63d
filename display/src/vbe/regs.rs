//! Real-mode register snapshot and far pointers.
//!
//! The firmware gateway takes a full register block in and hands an updated
//! block back. Callers never poke raw fields for the common cases; the named
//! accessors below cover the low words and the few high bytes VBE uses.

/// Register block passed across the firmware call boundary.
///
/// Field order mirrors the classic `com32sys_t` snapshot so a thunk can
/// copy it straight onto its real-mode stack frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct Registers {
    pub gs: u16,
    pub fs: u16,
    pub es: u16,
    pub ds: u16,
    pub edi: u32,
    pub esi: u32,
    pub ebp: u32,
    pub esp: u32,
    pub ebx: u32,
    pub edx: u32,
    pub ecx: u32,
    pub eax: u32,
    pub eflags: u32,
}

macro_rules! word_accessors {
    ($($reg:ident => $get:ident, $set:ident;)*) => {
        $(
            #[inline]
            pub const fn $get(&self) -> u16 {
                self.$reg as u16
            }

            #[inline]
            pub fn $set(&mut self, value: u16) {
                self.$reg = (self.$reg & 0xFFFF_0000) | value as u32;
            }
        )*
    };
}

impl Registers {
    /// All-zero register block.
    pub const fn new() -> Self {
        Self {
            gs: 0,
            fs: 0,
            es: 0,
            ds: 0,
            edi: 0,
            esi: 0,
            ebp: 0,
            esp: 0,
            ebx: 0,
            edx: 0,
            ecx: 0,
            eax: 0,
            eflags: 0,
        }
    }

    word_accessors! {
        eax => ax, set_ax;
        ebx => bx, set_bx;
        ecx => cx, set_cx;
        edx => dx, set_dx;
        edi => di, set_di;
        esi => si, set_si;
        ebp => bp, set_bp;
    }

    /// High byte of BX (font selector for INT 10h/1130h).
    #[inline]
    pub const fn bh(&self) -> u8 {
        (self.ebx >> 8) as u8
    }

    #[inline]
    pub fn set_bh(&mut self, value: u8) {
        self.ebx = (self.ebx & 0xFFFF_00FF) | ((value as u32) << 8);
    }

    /// Load ES:DI with a far pointer (buffer argument of most VBE calls).
    pub fn set_es_di(&mut self, ptr: FarPtr) {
        self.es = ptr.segment;
        self.set_di(ptr.offset);
    }

    /// ES:BP as a far pointer (return slot of the font query).
    pub const fn es_bp(&self) -> FarPtr {
        FarPtr::new(self.es, self.bp())
    }
}

/// Segment:offset pointer as firmware hands them out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FarPtr {
    pub segment: u16,
    pub offset: u16,
}

impl FarPtr {
    pub const NULL: FarPtr = FarPtr::new(0, 0);

    pub const fn new(segment: u16, offset: u16) -> Self {
        Self { segment, offset }
    }

    /// Decode the packed form used inside VBE info blocks: offset in the
    /// low word, segment in the high word.
    pub const fn from_raw(raw: u32) -> Self {
        Self::new((raw >> 16) as u16, raw as u16)
    }

    pub const fn to_raw(&self) -> u32 {
        ((self.segment as u32) << 16) | self.offset as u32
    }

    pub const fn is_null(&self) -> bool {
        self.segment == 0 && self.offset == 0
    }

    /// Linear address this pointer designates.
    pub const fn linear(&self) -> u32 {
        ((self.segment as u32) << 4) + self.offset as u32
    }

    /// Normalized pointer (offset < 16) for a linear address, or `None`
    /// when the address is out of real-mode reach.
    pub const fn from_linear(linear: u32) -> Option<Self> {
        if linear > 0xF_FFFF {
            return None;
        }
        Some(Self::new((linear >> 4) as u16, (linear & 0xF) as u16))
    }

    /// Pointer `bytes` further on, normalized.
    pub const fn offset_by(&self, bytes: u32) -> Option<Self> {
        match self.linear().checked_add(bytes) {
            Some(linear) => Self::from_linear(linear),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_accessors_preserve_high_half() {
        let mut regs = Registers::new();
        regs.eax = 0xDEAD_0000;
        regs.set_ax(0x4F00);
        assert_eq!(regs.eax, 0xDEAD_4F00);
        assert_eq!(regs.ax(), 0x4F00);
    }

    #[test]
    fn test_bh_accessor() {
        let mut regs = Registers::new();
        regs.set_bx(0x0012);
        regs.set_bh(0x06);
        assert_eq!(regs.bx(), 0x0612);
        assert_eq!(regs.bh(), 0x06);
    }

    #[test]
    fn test_far_ptr_raw_and_linear() {
        let ptr = FarPtr::from_raw(0xC000_1234);
        assert_eq!(ptr.segment, 0xC000);
        assert_eq!(ptr.offset, 0x1234);
        assert_eq!(ptr.to_raw(), 0xC000_1234);
        assert_eq!(ptr.linear(), 0xC_1234);
    }

    #[test]
    fn test_far_ptr_offset_normalizes() {
        let ptr = FarPtr::new(0x0800, 0xFFF0);
        let next = ptr.offset_by(0x20).unwrap();
        assert_eq!(next.linear(), ptr.linear() + 0x20);
        assert!(next.offset < 16);
    }

    #[test]
    fn test_far_ptr_out_of_reach() {
        assert!(FarPtr::from_linear(0x10_0000).is_none());
        assert!(FarPtr::new(0xFFFF, 0x000F).offset_by(1).is_none());
    }
}
