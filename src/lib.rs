//! Runtime CPU feature detection from OS capability reports.
//!
//! The OS is the only source consulted: on Linux-family systems the raw
//! `AT_HWCAP`/`AT_HWCAP2` words come from the auxiliary vector (via
//! `getauxval`, falling back to `/proc/self/auxv`), and on Windows each
//! feature is answered by `IsProcessorFeaturePresent`. The raw report is
//! mapped onto a flat, fully populated record per architecture, so no kernel
//! headers are needed at build time and detection never fails: an absent or
//! unreadable source simply yields a record with every feature off.
//!
//! ```no_run
//! # #[cfg(all(target_arch = "aarch64", target_os = "linux"))] {
//! let info = hwcaps::Aarch64Info::detect();
//! if info.features.aes && info.features.pmull {
//!     // dispatch to the hardware AES path
//! }
//! # }
//! ```
//!
//! Detection is stateless and re-entrant; callers wanting one probe per
//! process should cache the record themselves.

pub mod arch;
pub mod auxv;
pub mod hwcaps;
pub(crate) mod windows;

pub use arch::aarch64::{Aarch64Features, Aarch64Info, AARCH64_FEATURE_BITS};
pub use arch::arm::{ArmFeatures, ArmInfo, ARM_FEATURE_BITS};
pub use hwcaps::{find_feature, CapWord, FeatureBit, HardwareCapabilities};
