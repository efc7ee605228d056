//! 32-bit ARM feature detection.
//!
//! The registry mirrors `arch/arm/include/uapi/asm/hwcap.h`. On 32-bit ARM
//! the crypto and CRC extensions live in `AT_HWCAP2`, unlike AArch64 where
//! they sit in the primary word.

use serde::Serialize;

use crate::hwcaps::{features, HardwareCapabilities};

features! {
    /// ARM extension record, one field per known capability bit.
    pub struct ArmFeatures, table ARM_FEATURE_BITS {
        swp: (Hwcap, 0),
        half: (Hwcap, 1),
        thumb: (Hwcap, 2),
        _26bit: (Hwcap, 3),
        fastmult: (Hwcap, 4),
        fpa: (Hwcap, 5),
        vfp: (Hwcap, 6),
        edsp: (Hwcap, 7),
        java: (Hwcap, 8),
        iwmmxt: (Hwcap, 9),
        crunch: (Hwcap, 10),
        thumbee: (Hwcap, 11),
        neon: (Hwcap, 12),
        vfpv3: (Hwcap, 13),
        vfpv3d16: (Hwcap, 14),
        tls: (Hwcap, 15),
        vfpv4: (Hwcap, 16),
        idiva: (Hwcap, 17),
        idivt: (Hwcap, 18),
        vfpd32: (Hwcap, 19),
        lpae: (Hwcap, 20),
        evtstrm: (Hwcap, 21),
        aes: (Hwcap2, 0),
        pmull: (Hwcap2, 1),
        sha1: (Hwcap2, 2),
        sha2: (Hwcap2, 3),
        crc32: (Hwcap2, 4),
    }
}

/// Detection output for 32-bit ARM.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArmInfo {
    pub features: ArmFeatures,
}

impl ArmInfo {
    /// Bit-vector path: every field comes straight from the capability words.
    pub fn from_hwcaps(caps: HardwareCapabilities) -> Self {
        Self { features: ArmFeatures::from_hwcaps(caps) }
    }
}

cfg_if::cfg_if! {
    if #[cfg(all(target_arch = "arm", any(target_os = "linux", target_os = "android")))] {
        impl ArmInfo {
            /// Detects the features of the running CPU.
            pub fn detect() -> Self {
                Self::from_hwcaps(crate::auxv::hardware_capabilities())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::hwcaps::find_feature;

    fn mask_of(name: &str) -> HardwareCapabilities {
        find_feature(ARM_FEATURE_BITS, name).unwrap().mask()
    }

    #[test]
    fn test_crypto_bits_come_from_the_secondary_word() {
        let caps = mask_of("aes") | mask_of("crc32");
        assert_eq!(caps.hwcap, 0);

        let expected = ArmFeatures { aes: true, crc32: true, ..Default::default() };
        assert_eq!(ArmFeatures::from_hwcaps(caps), expected);
    }

    #[test]
    fn test_neon_and_vfp_bits() {
        let caps = mask_of("neon") | mask_of("vfpv4");
        let features = ArmFeatures::from_hwcaps(caps);

        let expected = ArmFeatures { neon: true, vfpv4: true, ..Default::default() };
        assert_eq!(features, expected);
    }

    #[test]
    fn test_unknown_bits_do_not_alter_the_record() {
        let caps = HardwareCapabilities { hwcap: 1 << 30, hwcap2: 1 << 20 };
        assert_eq!(ArmFeatures::from_hwcaps(caps), ArmFeatures::default());
    }

    #[test]
    fn test_zero_report_yields_default_record() {
        assert_eq!(ArmInfo::from_hwcaps(HardwareCapabilities::EMPTY), ArmInfo::default());
    }

    #[test]
    fn test_registry_has_no_aliased_bits_or_names() {
        let mut slots = HashSet::new();
        for feature in ARM_FEATURE_BITS {
            assert!(
                slots.insert((feature.word, feature.bit)),
                "duplicate bit assignment: {:?}",
                feature
            );
        }
        assert_eq!(ARM_FEATURE_BITS.len(), 27);
    }
}
