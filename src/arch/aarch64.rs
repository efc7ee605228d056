//! AArch64 feature detection.
//!
//! On Linux-family systems every field is derived from the raw
//! `AT_HWCAP`/`AT_HWCAP2` words; the registry below mirrors
//! `arch/arm64/include/uapi/asm/hwcap.h`. On Windows the record is populated
//! through the processor-feature API instead, which is coarser: a single
//! crypto selector stands in for four instruction groups.

use serde::Serialize;

use crate::hwcaps::{features, HardwareCapabilities};
use crate::windows::{
    PF_ARM_NEON_INSTRUCTIONS_AVAILABLE, PF_ARM_V81_ATOMIC_INSTRUCTIONS_AVAILABLE,
    PF_ARM_V82_DP_INSTRUCTIONS_AVAILABLE, PF_ARM_V83_JSCVT_INSTRUCTIONS_AVAILABLE,
    PF_ARM_V83_LRCPC_INSTRUCTIONS_AVAILABLE, PF_ARM_V8_CRC32_INSTRUCTIONS_AVAILABLE,
    PF_ARM_V8_CRYPTO_INSTRUCTIONS_AVAILABLE, PF_ARM_VFP_32_REGISTERS_AVAILABLE,
};

features! {
    /// AArch64 extension record, one field per known capability bit.
    ///
    /// Field set and order are part of the public contract: new extensions
    /// are appended, existing fields never change meaning.
    pub struct Aarch64Features, table AARCH64_FEATURE_BITS {
        fp: (Hwcap, 0),
        asimd: (Hwcap, 1),
        evtstrm: (Hwcap, 2),
        aes: (Hwcap, 3),
        pmull: (Hwcap, 4),
        sha1: (Hwcap, 5),
        sha2: (Hwcap, 6),
        crc32: (Hwcap, 7),
        atomics: (Hwcap, 8),
        fphp: (Hwcap, 9),
        asimdhp: (Hwcap, 10),
        cpuid: (Hwcap, 11),
        asimdrdm: (Hwcap, 12),
        jscvt: (Hwcap, 13),
        fcma: (Hwcap, 14),
        lrcpc: (Hwcap, 15),
        dcpop: (Hwcap, 16),
        sha3: (Hwcap, 17),
        sm3: (Hwcap, 18),
        sm4: (Hwcap, 19),
        asimddp: (Hwcap, 20),
        sha512: (Hwcap, 21),
        sve: (Hwcap, 22),
        asimdfhm: (Hwcap, 23),
        dit: (Hwcap, 24),
        uscat: (Hwcap, 25),
        ilrcpc: (Hwcap, 26),
        flagm: (Hwcap, 27),
        ssbs: (Hwcap, 28),
        sb: (Hwcap, 29),
        paca: (Hwcap, 30),
        pacg: (Hwcap, 31),
        dcpodp: (Hwcap2, 0),
        sve2: (Hwcap2, 1),
        sveaes: (Hwcap2, 2),
        svepmull: (Hwcap2, 3),
        svebitperm: (Hwcap2, 4),
        svesha3: (Hwcap2, 5),
        svesm4: (Hwcap2, 6),
        flagm2: (Hwcap2, 7),
        frint: (Hwcap2, 8),
        svei8mm: (Hwcap2, 9),
        svef32mm: (Hwcap2, 10),
        svef64mm: (Hwcap2, 11),
        svebf16: (Hwcap2, 12),
        i8mm: (Hwcap2, 13),
        bf16: (Hwcap2, 14),
        dgh: (Hwcap2, 15),
        rng: (Hwcap2, 16),
        bti: (Hwcap2, 17),
        mte: (Hwcap2, 18),
        ecv: (Hwcap2, 19),
        afp: (Hwcap2, 20),
        rpres: (Hwcap2, 21),
        mte3: (Hwcap2, 22),
        sme: (Hwcap2, 23),
        sme_i16i64: (Hwcap2, 24),
        sme_f64f64: (Hwcap2, 25),
        sme_i8i32: (Hwcap2, 26),
        sme_f16f32: (Hwcap2, 27),
        sme_b16f32: (Hwcap2, 28),
        sme_f32f32: (Hwcap2, 29),
        sme_fa64: (Hwcap2, 30),
        wfxt: (Hwcap2, 31),
        ebf16: (Hwcap2, 32),
        sve_ebf16: (Hwcap2, 33),
        cssc: (Hwcap2, 34),
        rprfm: (Hwcap2, 35),
        sve2p1: (Hwcap2, 36),
        sme2: (Hwcap2, 37),
        sme2p1: (Hwcap2, 38),
        sme_i16i32: (Hwcap2, 39),
        sme_bi32i32: (Hwcap2, 40),
        sme_b16b16: (Hwcap2, 41),
        sme_f16f16: (Hwcap2, 42),
        mops: (Hwcap2, 43),
        hbc: (Hwcap2, 44),
        sve_b16b16: (Hwcap2, 45),
        lrcpc3: (Hwcap2, 46),
        lse128: (Hwcap2, 47),
        fpmr: (Hwcap2, 48),
        lut: (Hwcap2, 49),
        faminmax: (Hwcap2, 50),
        f8cvt: (Hwcap2, 51),
        f8fma: (Hwcap2, 52),
        f8dp4: (Hwcap2, 53),
        f8dp2: (Hwcap2, 54),
        f8e4m3: (Hwcap2, 55),
        f8e5m2: (Hwcap2, 56),
        sme_lutv2: (Hwcap2, 57),
        sme_f8f16: (Hwcap2, 58),
        sme_f8f32: (Hwcap2, 59),
        sme_sf8fma: (Hwcap2, 60),
        sme_sf8dp4: (Hwcap2, 61),
        sme_sf8dp2: (Hwcap2, 62),
        poe: (Hwcap2, 63),
    }
}

/// Detection output for AArch64.
///
/// `revision` is informational only and gates no feature field; it is
/// populated from the Windows system-information query and stays zero on
/// auxv-based platforms.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Aarch64Info {
    pub features: Aarch64Features,
    pub revision: u16,
}

impl Aarch64Info {
    /// Bit-vector path: every field comes straight from the capability words.
    pub fn from_hwcaps(caps: HardwareCapabilities) -> Self {
        Self { features: Aarch64Features::from_hwcaps(caps), revision: 0 }
    }

    /// Feature-API path. `present` answers one `IsProcessorFeaturePresent`
    /// selector at a time.
    ///
    /// The single V8 crypto selector fans out to `aes`, `sha1`, `sha2` and
    /// `pmull`: Windows does not report those instruction groups
    /// individually, and the fan-out table reproduces exactly what the OS
    /// exposes. Everything the API cannot answer stays false.
    pub fn from_feature_checks(mut present: impl FnMut(u32) -> bool, revision: u16) -> Self {
        let mut features = Aarch64Features::default();
        features.fp = present(PF_ARM_VFP_32_REGISTERS_AVAILABLE);
        features.asimd = present(PF_ARM_NEON_INSTRUCTIONS_AVAILABLE);
        features.crc32 = present(PF_ARM_V8_CRC32_INSTRUCTIONS_AVAILABLE);
        features.asimddp = present(PF_ARM_V82_DP_INSTRUCTIONS_AVAILABLE);
        features.jscvt = present(PF_ARM_V83_JSCVT_INSTRUCTIONS_AVAILABLE);
        features.lrcpc = present(PF_ARM_V83_LRCPC_INSTRUCTIONS_AVAILABLE);
        features.atomics = present(PF_ARM_V81_ATOMIC_INSTRUCTIONS_AVAILABLE);

        let crypto = present(PF_ARM_V8_CRYPTO_INSTRUCTIONS_AVAILABLE);
        features.aes = crypto;
        features.sha1 = crypto;
        features.sha2 = crypto;
        features.pmull = crypto;

        Self { features, revision }
    }
}

cfg_if::cfg_if! {
    if #[cfg(all(target_arch = "aarch64", any(target_os = "linux", target_os = "android")))] {
        impl Aarch64Info {
            /// Detects the features of the running CPU.
            pub fn detect() -> Self {
                Self::from_hwcaps(crate::auxv::hardware_capabilities())
            }
        }
    } else if #[cfg(all(target_arch = "aarch64", target_os = "windows"))] {
        impl Aarch64Info {
            /// Detects the features of the running CPU.
            pub fn detect() -> Self {
                Self::from_feature_checks(
                    crate::windows::is_processor_feature_present,
                    crate::windows::processor_revision(),
                )
            }
        }
    }
}
