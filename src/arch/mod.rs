//! Per-architecture feature records and extractors.
//!
//! The pure extractors (`from_hwcaps`, `from_feature_checks`) compile on
//! every target; only the `detect()` entry points are gated to the matching
//! architecture and OS.

pub mod aarch64;
pub mod arm;
