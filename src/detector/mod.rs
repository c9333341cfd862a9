//! Face detector: runs the stages in order and always returns a
//! [`FaceScan`](crate::types::FaceScan).
//!
//! Stages
//! - edges: grayscale, blur, Canny, morphological closing.
//! - grid: sticker clustering or face-outline rectification, behind the
//!   [`GridResolver`](crate::grid::GridResolver) trait.
//! - sample: per-cell median HSV and rule-based labels.
//! - validate: unknown-count and center checks.
//!
//! Each stage is timed into the scan's diagnostics.

pub mod params;
mod pipeline;

pub use params::DetectorParams;
pub use pipeline::{FaceDetector, FaceJob};
