//! Raw capability words and the per-architecture bit registries.
//!
//! The kernel reports hardware capabilities as two fixed-width bitmasks whose
//! bit assignments live in the uapi hwcap headers. Those assignments are
//! reproduced here as data: each architecture carries a table of
//! [`FeatureBit`] entries, and the extractors consult the table instead of
//! open-coded bit twiddling.

use std::ops::BitOr;

use serde::Serialize;

/// The two capability words returned by the OS for the main (`AT_HWCAP`) and
/// extended (`AT_HWCAP2`) capability classes. An all-zero value is a
/// legitimate report meaning "no capability claims".
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HardwareCapabilities {
    pub hwcap: u64,
    pub hwcap2: u64,
}

impl HardwareCapabilities {
    pub const EMPTY: Self = Self { hwcap: 0, hwcap2: 0 };

    /// True when every bit of `mask` is also set in `self`, checked per word.
    ///
    /// Pure and total; an empty mask is trivially satisfied.
    pub const fn contains(self, mask: Self) -> bool {
        (self.hwcap & mask.hwcap) == mask.hwcap && (self.hwcap2 & mask.hwcap2) == mask.hwcap2
    }
}

impl BitOr for HardwareCapabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            hwcap: self.hwcap | rhs.hwcap,
            hwcap2: self.hwcap2 | rhs.hwcap2,
        }
    }
}

/// Which of the two capability words a feature bit lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapWord {
    Hwcap,
    Hwcap2,
}

/// One registry entry: a symbolic feature name tied to a single bit of a
/// single capability word.
///
/// The tables mirror the kernel's published assignments; a bit reassignment
/// upstream is a compatibility break, not something this crate can absorb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureBit {
    pub name: &'static str,
    pub word: CapWord,
    pub bit: u32,
}

impl FeatureBit {
    pub const fn hwcap(name: &'static str, bit: u32) -> Self {
        Self { name, word: CapWord::Hwcap, bit }
    }

    pub const fn hwcap2(name: &'static str, bit: u32) -> Self {
        Self { name, word: CapWord::Hwcap2, bit }
    }

    /// Single-bit mask selecting this feature.
    pub const fn mask(self) -> HardwareCapabilities {
        match self.word {
            CapWord::Hwcap => HardwareCapabilities { hwcap: 1 << self.bit, hwcap2: 0 },
            CapWord::Hwcap2 => HardwareCapabilities { hwcap: 0, hwcap2: 1 << self.bit },
        }
    }

    /// Tests this one feature against a retrieved capability pair.
    pub fn is_set_in(self, caps: HardwareCapabilities) -> bool {
        caps.contains(self.mask())
    }
}

/// Looks one symbolic feature name up in an architecture registry table.
pub fn find_feature(table: &'static [FeatureBit], name: &str) -> Option<FeatureBit> {
    table.iter().copied().find(|f| f.name == name)
}

/// Declares an architecture feature record together with its bit registry and
/// its bit-vector extractor, all generated from one list of
/// `field: (word, bit)` rows so the three can never drift apart.
macro_rules! features {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident, table $table:ident {
            $($field:ident: ($word:ident, $bit:literal),)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
        $vis struct $name {
            $(pub $field: bool,)*
        }

        $vis const $table: &[$crate::hwcaps::FeatureBit] = &[
            $($crate::hwcaps::FeatureBit {
                name: stringify!($field),
                word: $crate::hwcaps::CapWord::$word,
                bit: $bit,
            },)*
        ];

        impl $name {
            /// Populates every field from a raw capability pair. Bits outside
            /// the registry are ignored.
            pub fn from_hwcaps(caps: $crate::hwcaps::HardwareCapabilities) -> Self {
                Self {
                    $($field: $crate::hwcaps::FeatureBit {
                        name: stringify!($field),
                        word: $crate::hwcaps::CapWord::$word,
                        bit: $bit,
                    }
                    .is_set_in(caps),)*
                }
            }
        }
    };
}
pub(crate) use features;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_per_word() {
        let value = HardwareCapabilities { hwcap: 0b1011, hwcap2: 0b0100 };

        assert!(value.contains(HardwareCapabilities { hwcap: 0b0011, hwcap2: 0 }));
        assert!(value.contains(HardwareCapabilities { hwcap: 0b1000, hwcap2: 0b0100 }));
        // Bit missing from the primary word.
        assert!(!value.contains(HardwareCapabilities { hwcap: 0b0100, hwcap2: 0 }));
        // Primary satisfied, secondary not: both words must match.
        assert!(!value.contains(HardwareCapabilities { hwcap: 0b0001, hwcap2: 0b0010 }));
    }

    #[test]
    fn test_empty_mask_always_satisfied() {
        for value in [
            HardwareCapabilities::EMPTY,
            HardwareCapabilities { hwcap: u64::MAX, hwcap2: u64::MAX },
            HardwareCapabilities { hwcap: 0, hwcap2: 1 },
        ] {
            assert!(value.contains(HardwareCapabilities::EMPTY));
        }
    }

    #[test]
    fn test_feature_bit_mask_targets_one_word() {
        let fp = FeatureBit::hwcap("fp", 0);
        assert_eq!(fp.mask(), HardwareCapabilities { hwcap: 1, hwcap2: 0 });

        let sve2 = FeatureBit::hwcap2("sve2", 1);
        assert_eq!(sve2.mask(), HardwareCapabilities { hwcap: 0, hwcap2: 2 });

        assert!(sve2.is_set_in(HardwareCapabilities { hwcap: 0, hwcap2: 0b10 }));
        // Same bit index in the wrong word must not count.
        assert!(!sve2.is_set_in(HardwareCapabilities { hwcap: 0b10, hwcap2: 0 }));
    }

    #[test]
    fn test_mask_composition() {
        let a = FeatureBit::hwcap("aes", 3).mask();
        let b = FeatureBit::hwcap("sha1", 5).mask();
        assert_eq!(a | b, HardwareCapabilities { hwcap: (1 << 3) | (1 << 5), hwcap2: 0 });
    }

    #[test]
    fn test_find_feature() {
        const TABLE: &[FeatureBit] =
            &[FeatureBit::hwcap("aes", 3), FeatureBit::hwcap2("sve2", 1)];
        assert_eq!(find_feature(TABLE, "sve2"), Some(FeatureBit::hwcap2("sve2", 1)));
        assert_eq!(find_feature(TABLE, "avx2"), None);
    }
}
