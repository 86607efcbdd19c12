/// CPU privilege rings as numeric privilege levels (0–3).
///
/// The low two bits of a segment selector carry a ring as its **RPL**; for
/// the live `CS` that value is the **current privilege level** (CPL).
///
/// | Ring | Typical use |
/// |------|-------------|
/// | 0 | kernel |
/// | 1, 2 | unused on modern 64-bit kernels |
/// | 3 | user mode |
///
/// A restore target normally carries [`Ring::Ring3`] in both its `CS` and
/// `SS` selectors; `iretq` to ring 3 with a ring-0 `SS` raises `#GP`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum Ring {
    /// Kernel or supervisor mode.
    Ring0 = 0,
    Ring1 = 1,
    Ring2 = 2,
    /// User mode.
    Ring3 = 3,
}

impl Ring {
    /// Decode from the low two bits; higher bits are ignored.
    #[inline]
    #[must_use]
    pub const fn from_bits(value: u16) -> Self {
        match value & 0b11 {
            0 => Self::Ring0,
            1 => Self::Ring1,
            2 => Self::Ring2,
            _ => Self::Ring3,
        }
    }

    #[inline]
    #[must_use]
    pub const fn into_bits(self) -> u16 {
        self as u16
    }

    #[inline]
    #[must_use]
    pub const fn is_user(self) -> bool {
        matches!(self, Self::Ring3)
    }
}

impl From<Ring> for u8 {
    #[inline]
    fn from(r: Ring) -> Self {
        r as u8
    }
}

impl TryFrom<u8> for Ring {
    type Error = u8;

    #[inline]
    fn try_from(r: u8) -> Result<Self, Self::Error> {
        if r <= 3 {
            Ok(Self::from_bits(u16::from(r)))
        } else {
            Err(r)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_roundtrip() {
        for b in 0u16..=3 {
            assert_eq!(Ring::from_bits(b).into_bits(), b);
        }
    }

    #[test]
    fn only_low_bits_count() {
        assert_eq!(Ring::from_bits(0x33), Ring::Ring3);
        assert_eq!(Ring::from_bits(0x10), Ring::Ring0);
    }

    #[test]
    fn only_ring3_is_user() {
        assert!(Ring::Ring3.is_user());
        assert!(!Ring::Ring0.is_user());
        assert!(!Ring::from_bits(0x10).is_user());
        assert!(Ring::from_bits(0x2b).is_user());
    }

    #[test]
    fn try_from_rejects_out_of_range() {
        assert_eq!(Ring::try_from(3u8), Ok(Ring::Ring3));
        assert_eq!(Ring::try_from(4u8), Err(4));
    }
}
