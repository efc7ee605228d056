//! Windows processor-feature query bindings.
//!
//! The `PF_*` selectors are reproduced here with their winnt.h values so the
//! fan-out tables compile and stay testable off-Windows; only the two FFI
//! shims need the real OS.

pub(crate) const PF_ARM_VFP_32_REGISTERS_AVAILABLE: u32 = 18;
pub(crate) const PF_ARM_NEON_INSTRUCTIONS_AVAILABLE: u32 = 19;
pub(crate) const PF_ARM_V8_CRYPTO_INSTRUCTIONS_AVAILABLE: u32 = 30;
pub(crate) const PF_ARM_V8_CRC32_INSTRUCTIONS_AVAILABLE: u32 = 31;
pub(crate) const PF_ARM_V81_ATOMIC_INSTRUCTIONS_AVAILABLE: u32 = 34;
pub(crate) const PF_ARM_V82_DP_INSTRUCTIONS_AVAILABLE: u32 = 43;
pub(crate) const PF_ARM_V83_JSCVT_INSTRUCTIONS_AVAILABLE: u32 = 44;
pub(crate) const PF_ARM_V83_LRCPC_INSTRUCTIONS_AVAILABLE: u32 = 45;

/// An unrecognized selector returns false; the API has no error path.
#[cfg(windows)]
pub(crate) fn is_processor_feature_present(feature: u32) -> bool {
    unsafe { windows_sys::Win32::System::Threading::IsProcessorFeaturePresent(feature) != 0 }
}

#[cfg(windows)]
pub(crate) fn processor_revision() -> u16 {
    use windows_sys::Win32::System::SystemInformation::{GetNativeSystemInfo, SYSTEM_INFO};

    let mut info: SYSTEM_INFO = unsafe { std::mem::zeroed() };
    unsafe { GetNativeSystemInfo(&mut info) };
    info.wProcessorRevision
}
