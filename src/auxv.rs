//! Capability acquisition from the ELF auxiliary vector.
//!
//! `getauxval(3)` is the primary source. If it reports nothing for
//! `AT_HWCAP`, the process falls back, once and permanently, to scanning
//! `/proc/self/auxv` directly; that file holds the same `(type, value)`
//! pairs the kernel placed on the startup stack. Neither path ever raises an
//! error to callers: an absent or unreadable source degrades to an all-zero
//! capability report.

#[cfg(any(target_os = "linux", target_os = "android", test))]
use std::fs::File;
#[cfg(any(target_os = "linux", target_os = "android", test))]
use std::io::Read;
#[cfg(any(target_os = "linux", target_os = "android", test))]
use std::path::Path;

#[cfg(any(target_os = "linux", target_os = "android", test))]
use thiserror::Error;

#[cfg(any(target_os = "linux", target_os = "android", test))]
use crate::hwcaps::HardwareCapabilities;

/// Native auxiliary-vector word. Entries are `(type, value)` pairs sized to
/// the platform pointer width, so 32-bit on 32-bit targets.
pub type AuxvWord = usize;

pub const AT_NULL: AuxvWord = 0;
pub const AT_PLATFORM: AuxvWord = 15;
pub const AT_HWCAP: AuxvWord = 16;
pub const AT_BASE_PLATFORM: AuxvWord = 24;
pub const AT_HWCAP2: AuxvWord = 26;

#[cfg(any(target_os = "linux", target_os = "android", test))]
const WORD: usize = std::mem::size_of::<AuxvWord>();

#[cfg(any(target_os = "linux", target_os = "android", test))]
#[derive(Debug, Error)]
pub(crate) enum SourceError {
    #[error("auxiliary vector file unreadable: {0}")]
    Io(#[from] std::io::Error),
}

/// Values of interest collected in one pass over an auxv stream.
#[cfg(any(target_os = "linux", target_os = "android", test))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AuxvEntries {
    pub hwcap: Option<AuxvWord>,
    pub hwcap2: Option<AuxvWord>,
    pub platform: Option<AuxvWord>,
    pub base_platform: Option<AuxvWord>,
}

#[cfg(any(target_os = "linux", target_os = "android", test))]
impl AuxvEntries {
    pub(crate) fn capabilities(&self) -> HardwareCapabilities {
        HardwareCapabilities {
            hwcap: self.hwcap.unwrap_or(0) as u64,
            hwcap2: self.hwcap2.unwrap_or(0) as u64,
        }
    }
}

/// Scans a stream of native-width `(type, value)` pairs, stopping at the
/// `AT_NULL` terminator or at the first short read. A truncated or malformed
/// tail yields whatever was collected up to that point.
#[cfg(any(target_os = "linux", target_os = "android", test))]
pub(crate) fn scan_auxv<R: Read>(mut reader: R) -> AuxvEntries {
    let mut entries = AuxvEntries::default();
    let mut buf = [0u8; 2 * WORD];
    loop {
        if reader.read_exact(&mut buf).is_err() {
            tracing::trace!("auxv stream ended without an AT_NULL terminator");
            break;
        }
        let ty = AuxvWord::from_ne_bytes(buf[..WORD].try_into().unwrap());
        let value = AuxvWord::from_ne_bytes(buf[WORD..].try_into().unwrap());
        match ty {
            AT_NULL => break,
            AT_HWCAP => entries.hwcap = Some(value),
            AT_HWCAP2 => entries.hwcap2 = Some(value),
            AT_PLATFORM => entries.platform = Some(value),
            AT_BASE_PLATFORM => entries.base_platform = Some(value),
            _ => {}
        }
    }
    entries
}

#[cfg(any(target_os = "linux", target_os = "android", test))]
pub(crate) fn scan_auxv_file(path: &Path) -> Result<AuxvEntries, SourceError> {
    let file = File::open(path)?;
    Ok(scan_auxv(file))
}

/// Which provider answers capability queries for this process.
#[cfg(any(target_os = "linux", target_os = "android", test))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Source {
    Getauxval,
    ProcFile,
}

/// Resolves the provider from one probe of the primary primitive.
///
/// `AT_HWCAP` is the probe type: every kernel that fills the auxiliary
/// vector sets at least one bit there, so a zero answer means the primitive
/// is not usable and the file scan takes over.
#[cfg(any(target_os = "linux", target_os = "android", test))]
pub(crate) fn resolve_source(probe: impl FnOnce(AuxvWord) -> Option<AuxvWord>) -> Source {
    if probe(AT_HWCAP).is_some() {
        Source::Getauxval
    } else {
        tracing::debug!("getauxval reported no hardware capabilities, using the auxv file scan");
        Source::ProcFile
    }
}

/// Retrieves the entries of interest through the resolved provider. An
/// unreadable fallback file degrades to the empty entry set.
#[cfg(any(target_os = "linux", target_os = "android", test))]
pub(crate) fn entries_from(
    source: Source,
    getauxval: impl Fn(AuxvWord) -> Option<AuxvWord>,
    auxv_path: &Path,
) -> AuxvEntries {
    match source {
        Source::Getauxval => AuxvEntries {
            hwcap: getauxval(AT_HWCAP),
            hwcap2: getauxval(AT_HWCAP2),
            platform: getauxval(AT_PLATFORM),
            base_platform: getauxval(AT_BASE_PLATFORM),
        },
        Source::ProcFile => match scan_auxv_file(auxv_path) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!("auxv fallback unavailable: {err}");
                AuxvEntries::default()
            }
        },
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
mod imp {
    use std::ffi::CStr;
    use std::path::Path;
    use std::sync::OnceLock;

    use super::{entries_from, resolve_source, AuxvEntries, AuxvWord, Source};
    use crate::hwcaps::HardwareCapabilities;

    const PROC_SELF_AUXV: &str = "/proc/self/auxv";

    /// `getauxval` returns 0 with no error signal when a type is not
    /// recognized, so 0 doubles as the not-found sentinel here.
    fn getauxval(ty: AuxvWord) -> Option<AuxvWord> {
        let value = unsafe { libc::getauxval(ty as libc::c_ulong) };
        (value != 0).then_some(value as AuxvWord)
    }

    /// Probes once; the resolved provider holds for the process lifetime.
    fn source() -> Source {
        static SOURCE: OnceLock<Source> = OnceLock::new();
        *SOURCE.get_or_init(|| resolve_source(getauxval))
    }

    fn entries() -> AuxvEntries {
        entries_from(source(), getauxval, Path::new(PROC_SELF_AUXV))
    }

    /// Raw `AT_HWCAP`/`AT_HWCAP2` words for the running process.
    ///
    /// Never fails; a host without either source reports `{0, 0}`.
    pub fn hardware_capabilities() -> HardwareCapabilities {
        entries().capabilities()
    }

    /// The `AT_PLATFORM` string, if the kernel provided one.
    pub fn platform() -> Option<&'static CStr> {
        entries().platform.and_then(cstr_from)
    }

    /// The `AT_BASE_PLATFORM` string, if the kernel provided one.
    pub fn base_platform() -> Option<&'static CStr> {
        entries().base_platform.and_then(cstr_from)
    }

    fn cstr_from(value: AuxvWord) -> Option<&'static CStr> {
        if value == 0 {
            return None;
        }
        // The value is a pointer into the kernel-provided aux area of this
        // process, valid for the process lifetime and never freed by us.
        Some(unsafe { CStr::from_ptr(value as *const libc::c_char) })
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
pub use imp::{base_platform, hardware_capabilities, platform};
