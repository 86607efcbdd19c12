use crate::privilege::Ring;
use crate::rflags::Rflags;
use crate::selector::SegmentSelector;
use core::fmt;

/// Landing function entered after [`restore_state`].
///
/// It runs on the restored stack and has no caller to return to.
pub type ResumeEntry = extern "C" fn() -> !;

/// The four registers `iretq` needs to resume a user-mode point.
///
/// The field order matches the classic C layout (`cs`, `ss`, `rsp`,
/// `rflags` at offsets `0x00`..`0x18`), so payloads that read the struct by
/// offset keep working.
#[repr(C)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct UserState {
    pub cs: u64,
    pub ss: u64,
    pub rsp: u64,
    pub rflags: u64,
}

impl UserState {
    /// Build a restore target by hand.
    #[must_use]
    pub const fn new(cs: u64, ss: u64, rsp: u64, rflags: u64) -> Self {
        Self {
            cs,
            ss,
            rsp,
            rflags,
        }
    }

    /// Snapshot `CS`, `SS`, `RSP` and `RFLAGS` of the calling thread.
    ///
    /// All four are read inside one `asm!` block, so no compiler-generated
    /// push, pop or flag-writing instruction can land between them. Always
    /// inlined: the captured `RSP` belongs to the caller's frame.
    #[cfg(feature = "asm")]
    #[allow(clippy::inline_always)]
    #[inline(always)]
    #[must_use]
    pub fn capture() -> Self {
        let (cs, ss): (u16, u16);
        let (rsp, rflags): (u64, u64);
        unsafe {
            core::arch::asm!(
                "mov {cs:x}, cs",
                "mov {ss:x}, ss",
                "mov {rsp}, rsp",
                "pushfq",
                "pop {rflags}",
                cs = out(reg) cs,
                ss = out(reg) ss,
                rsp = out(reg) rsp,
                rflags = out(reg) rflags,
                options(preserves_flags)
            );
        }
        Self::new(u64::from(cs), u64::from(ss), rsp, rflags)
    }

    #[inline]
    #[must_use]
    pub const fn code_selector(&self) -> SegmentSelector {
        SegmentSelector::from_word(self.cs)
    }

    #[inline]
    #[must_use]
    pub const fn stack_selector(&self) -> SegmentSelector {
        SegmentSelector::from_word(self.ss)
    }

    #[inline]
    #[must_use]
    pub const fn flags(&self) -> Rflags {
        Rflags::from_bits(self.rflags)
    }

    /// Privilege level the state resumes at (RPL of `CS`).
    #[inline]
    #[must_use]
    pub const fn privilege(&self) -> Ring {
        self.code_selector().rpl()
    }

    /// Same state with a different stack pointer, e.g. a pivoted stack.
    #[inline]
    #[must_use]
    pub const fn with_stack(self, rsp: u64) -> Self {
        Self { rsp, ..self }
    }

    /// The fields in layout order, as a payload would embed them.
    #[inline]
    #[must_use]
    pub const fn to_words(self) -> [u64; 4] {
        [self.cs, self.ss, self.rsp, self.rflags]
    }
}

impl fmt::Display for UserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cs={:#x} ss={:#x} rsp={:#018x} rflags={:#x}",
            self.cs, self.ss, self.rsp, self.rflags
        )
    }
}

/// Stack alignment shim between `iretq` and the landing function.
///
/// `iretq` leaves `RSP` at the captured value, which has no particular
/// alignment. Align to 16 and `call` so the entry sees `RSP ≡ 8 (mod 16)`.
#[cfg(feature = "asm")]
#[unsafe(naked)]
extern "C" fn resume_trampoline() -> ! {
    core::arch::naked_asm!("cld", "and rsp, -16", "call r12", "ud2")
}

/// Resume execution in `state` at `entry` through `iretq`.
///
/// Switches to `state.rsp`, builds the 64-bit interrupt-return frame on that
/// stack (`SS`, `RSP`, `RFLAGS`, `CS`, `RIP`, pushed in this order because
/// `iretq` pops them in reverse) and executes `iretq`. `entry` is reached via
/// a trampoline that realigns the stack.
///
/// # Safety
/// No validation is performed; a bad target faults instead of returning an
/// error. The caller guarantees that
/// - `state.rsp` points into mapped, writable memory with at least 48 bytes
///   free below it,
/// - `state.cs`/`state.ss` are valid selectors for the target privilege level
///   (for a user target both carry RPL 3),
/// - `state.rflags` does not enable a trap that immediately faults,
/// - nothing still borrows the stack memory below `state.rsp`.
#[cfg(feature = "asm")]
pub unsafe fn restore_state(state: UserState, entry: ResumeEntry) -> ! {
    let rip = resume_trampoline as ResumeEntry as usize;
    unsafe {
        core::arch::asm!(
            "mov rsp, {sp}",
            "push {ss}",
            "push {sp}",
            "push {flags}",
            "push {cs}",
            "push {rip}",
            "iretq",
            sp = in(reg) state.rsp,
            ss = in(reg) state.ss,
            flags = in(reg) state.rflags,
            cs = in(reg) state.cs,
            rip = in(reg) rip,
            in("r12") entry as usize,
            options(noreturn)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_c_struct() {
        assert_eq!(core::mem::size_of::<UserState>(), 32);
        assert_eq!(core::mem::offset_of!(UserState, cs), 0x00);
        assert_eq!(core::mem::offset_of!(UserState, ss), 0x08);
        assert_eq!(core::mem::offset_of!(UserState, rsp), 0x10);
        assert_eq!(core::mem::offset_of!(UserState, rflags), 0x18);
    }

    #[test]
    fn typed_views() {
        let s = UserState::new(0x33, 0x2b, 0x7ffd_0000_1000, 0x246);
        assert_eq!(s.privilege(), Ring::Ring3);
        assert_eq!(s.code_selector().index(), 6);
        assert_eq!(s.stack_selector().index(), 5);
        assert!(s.flags().if_interrupt_enable());
    }

    #[test]
    fn with_stack_only_touches_rsp() {
        let s = UserState::new(0x33, 0x2b, 0x1000, 0x202);
        let p = s.with_stack(0x2000);
        assert_eq!(p.rsp, 0x2000);
        assert_eq!((p.cs, p.ss, p.rflags), (s.cs, s.ss, s.rflags));
    }

    #[test]
    fn words_follow_field_offsets() {
        let s = UserState::new(0x33, 0x2b, 0x7ffd_0000_1000, 0x246);
        assert_eq!(s.to_words(), [0x33, 0x2b, 0x7ffd_0000_1000, 0x246]);
    }

    #[test]
    fn display_format() {
        let s = UserState::new(0x33, 0x2b, 0x7ffd_dead_beef, 0x246);
        assert_eq!(
            s.to_string(),
            "cs=0x33 ss=0x2b rsp=0x00007ffddeadbeef rflags=0x246"
        );
    }

    #[test]
    fn capture_reports_user_mode() {
        let s = UserState::capture();
        assert_eq!(s.privilege(), Ring::Ring3);
        assert_eq!(s.stack_selector().rpl(), Ring::Ring3);
        assert_ne!(s.rsp, 0);
    }
}
