//! Segment selectors as they appear in `CS`/`SS` and in an `iretq` frame.
//!
//! ```text
//!  15            3 2  1  0
//! +----------------+--+----+
//! |   Index[12:0]  |TI| RPL|
//! +----------------+--+----+  (TI=0 → GDT, TI=1 → LDT; RPL=0..3)
//! ```
//!
//! On x86-64 Linux the user selectors are `0x33` (code, GDT index 6) and
//! `0x2b` (stack, GDT index 5), both with RPL 3.

use crate::privilege::Ring;
use bitfield_struct::bitfield;

/// Which descriptor table a selector addresses.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum Table {
    /// Global Descriptor Table
    Gdt = 0,
    /// Local Descriptor Table
    Ldt = 1,
}

impl Table {
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        if bits == 0 { Self::Gdt } else { Self::Ldt }
    }

    #[inline]
    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }
}

/// Raw 16-bit selector encoding (index/TI/RPL).
#[bitfield(u16)]
#[derive(Eq, PartialEq)]
pub struct SegmentSelector {
    /// Requested Privilege Level (bits 0..1).
    #[bits(2)]
    pub rpl: Ring,
    /// Table Indicator (bit 2).
    #[bits(1)]
    pub ti: Table,
    /// Descriptor index (bits 3..15).
    #[bits(13)]
    pub index: u16,
}

impl SegmentSelector {
    #[inline]
    #[must_use]
    pub const fn new_with(index: u16, table: Table, rpl: Ring) -> Self {
        Self::new().with_index(index).with_ti(table).with_rpl(rpl)
    }

    /// Decode the low 16 bits of a register word; the upper bits are ignored.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_word(word: u64) -> Self {
        Self::from_bits(word as u16)
    }

    /// The selector currently loaded in `CS`.
    #[cfg(feature = "asm")]
    #[inline]
    #[must_use]
    pub fn current_code() -> Self {
        let cs: u16;
        unsafe {
            core::arch::asm!("mov {:x}, cs", out(reg) cs, options(nomem, nostack, preserves_flags));
        }
        Self::from_bits(cs)
    }

    /// The selector currently loaded in `SS`.
    #[cfg(feature = "asm")]
    #[inline]
    #[must_use]
    pub fn current_stack() -> Self {
        let ss: u16;
        unsafe {
            core::arch::asm!("mov {:x}, ss", out(reg) ss, options(nomem, nostack, preserves_flags));
        }
        Self::from_bits(ss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_user_selectors() {
        let cs = SegmentSelector::from_word(0x33);
        assert_eq!(cs.index(), 6);
        assert_eq!(cs.ti(), Table::Gdt);
        assert_eq!(cs.rpl(), Ring::Ring3);

        let ss = SegmentSelector::from_word(0x2b);
        assert_eq!(ss.index(), 5);
        assert_eq!(ss.rpl(), Ring::Ring3);
    }

    #[test]
    fn build_matches_encoding() {
        let s = SegmentSelector::new_with(6, Table::Gdt, Ring::Ring3);
        assert_eq!(s.into_bits(), 0x33);
        let ldt = SegmentSelector::new_with(5, Table::Ldt, Ring::Ring0);
        assert_eq!(ldt.into_bits(), (5 << 3) | 0b100);
    }

    #[test]
    fn upper_word_bits_are_ignored() {
        assert_eq!(SegmentSelector::from_word(0xdead_0000_0033).into_bits(), 0x33);
    }

    #[test]
    fn live_selectors_are_ring3() {
        assert_eq!(SegmentSelector::current_code().rpl(), Ring::Ring3);
        assert_eq!(SegmentSelector::current_stack().rpl(), Ring::Ring3);
    }
}
