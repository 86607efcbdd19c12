use crate::LoadRegister;
use bitfield_struct::bitfield;

/// Architectural RFLAGS model for x86-64.
///
/// Bits that are fixed in 64-bit mode are private padding with their
/// architectural default. `iretq` at CPL 3 silently keeps the current `IF`
/// and `IOPL`, so a user-mode restore cannot change them.
#[bitfield(u64, order = Lsb)]
#[derive(PartialEq, Eq)]
pub struct Rflags {
    /// Carry Flag
    pub cf_carry: bool, // 0

    /// Always 1.
    #[bits(default = true)]
    _always1: bool, // 1

    /// Parity Flag
    pub pf_parity: bool, // 2

    #[bits(default = false)]
    _rsvd3: bool, // 3

    /// Adjust Flag
    pub af_adjust: bool, // 4

    #[bits(default = false)]
    _rsvd5: bool, // 5

    /// Zero Flag
    pub zf_zero: bool, // 6

    /// Sign Flag
    pub sf_sign: bool, // 7

    /// Trap Flag. A restore target with TF set single-steps into `SIGTRAP`.
    pub tf_trap: bool, // 8

    /// Interrupt Enable Flag
    pub if_interrupt_enable: bool, // 9

    /// Direction Flag. The System V ABI requires it clear on function entry.
    pub df_direction: bool, // 10

    /// Overflow Flag
    pub of_overflow: bool, // 11

    /// I/O Privilege Level
    #[bits(2)]
    pub iopl: u8, // 12–13

    /// Nested Task
    pub nt_nested: bool, // 14

    #[bits(default = false)]
    _rsvd15: bool, // 15

    /// Resume Flag
    pub rf_resume: bool, // 16

    /// Virtual 8086 mode, must be 0 in 64-bit mode.
    #[bits(default = false)]
    _vm: bool, // 17

    /// Alignment Check
    pub ac_alignment_check: bool, // 18

    /// Virtual Interrupt Flag
    pub vif_virtual_interrupt: bool, // 19

    /// Virtual Interrupt Pending
    pub vip_virtual_interrupt_pending: bool, // 20

    /// ID Flag: toggles CPUID availability.
    pub id_cpuid: bool, // 21

    #[bits(42, default = false)]
    _reserved_rest: u64,
}

impl Rflags {
    /// CF, PF, AF, ZF, SF and OF: the bits every ALU instruction rewrites.
    pub const STATUS_MASK: u64 = 1 << 0 | 1 << 2 | 1 << 4 | 1 << 6 | 1 << 7 | 1 << 11;

    /// The flags with all arithmetic status bits cleared.
    ///
    /// Two captures of the same thread agree on these bits even when the
    /// compiler placed a comparison between them.
    #[inline]
    #[must_use]
    pub const fn status_cleared(self) -> Self {
        Self::from_bits(self.into_bits() & !Self::STATUS_MASK)
    }
}

#[cfg(feature = "asm")]
impl LoadRegister for Rflags {
    #[inline]
    fn load() -> Self {
        let rflags: u64;
        unsafe {
            core::arch::asm!("pushfq", "pop {}", out(reg) rflags, options(nomem, preserves_flags));
        }
        Self::from_bits(rflags)
    }
}
