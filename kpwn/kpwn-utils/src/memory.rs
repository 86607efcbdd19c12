//! Memory inspection: hexdump, alignment helpers and well-known constants.

use core::fmt::Write as _;
use kpwn_log::sink::write_stderr;

/// Kernel text base when KASLR is off.
pub const NO_KASLR_BASE: u64 = 0xffff_ffff_8100_0000;

pub const PAGE_SIZE_4K: u64 = 0x1000;

const ROW: usize = 0x10;
const WORD: usize = 8;

/// Round `x` up to a multiple of `align` (a power of two).
#[inline]
#[must_use]
pub const fn align_up(x: u64, align: u64) -> u64 {
    (x + (align - 1)) & !(align - 1)
}

/// Round `x` down to a multiple of `align` (a power of two).
#[inline]
#[must_use]
pub const fn align_down(x: u64, align: u64) -> u64 {
    x & !(align - 1)
}

#[inline]
#[must_use]
pub const fn is_aligned(x: u64, align: u64) -> bool {
    x & (align - 1) == 0
}

fn word_at(bytes: &[u8], at: usize) -> u64 {
    let mut word = [0u8; WORD];
    word.copy_from_slice(&bytes[at..at + WORD]);
    u64::from_le_bytes(word)
}

/// Render `bytes` as rows of two little-endian 64-bit words.
///
/// Full rows print both words with a `0x` prefix. A trailing partial row
/// prints any complete first word without a prefix, then the remaining
/// bytes highest-address first behind two-space placeholders for the missing
/// ones, so they read as the low end of a little-endian word.
#[must_use]
pub fn format_hexdump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() / ROW + 4) * 64);
    let full_rows = bytes.len() / ROW;
    let remainder = bytes.len() % ROW;

    out.push_str("\n------------------------HexDump------------------------\n");
    for row in 0..full_rows {
        let at = row * ROW;
        let _ = writeln!(
            out,
            "0x{:016x}:\t0x{:016x}\t0x{:016x}",
            at,
            word_at(bytes, at),
            word_at(bytes, at + WORD)
        );
    }

    if remainder != 0 {
        let mut at = full_rows * ROW;
        let _ = write!(out, "0x{at:016x}:\t");

        let mut tail = remainder;
        // Tail bytes only; never read past the end of `bytes`.
        if remainder > WORD {
            let _ = write!(out, "{:016x}", word_at(bytes, at));
            at += WORD;
            tail -= WORD;
        }

        out.push_str("0x");
        for _ in tail..WORD {
            out.push_str("  ");
        }
        for byte in bytes[at..at + tail].iter().rev() {
            let _ = write!(out, "{byte:02x}");
        }
    }

    out.push_str("\n-------------------------------------------------------\n\n");
    out
}

/// Hexdump `bytes` to stderr.
pub fn hexdump(bytes: &[u8]) {
    log::debug!("hexdump of {} bytes at {:p}", bytes.len(), bytes.as_ptr());
    write_stderr(&format_hexdump(bytes));
}

/// Hexdump `len` bytes starting at `addr`.
///
/// # Safety
/// `addr..addr + len` must be readable for the duration of the call.
pub unsafe fn hexdump_raw(addr: *const u8, len: usize) {
    let bytes = unsafe { core::slice::from_raw_parts(addr, len) };
    hexdump(bytes);
}
