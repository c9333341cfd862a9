#![doc = include_str!("../README.md")]

// Pipeline stages
pub mod color;
pub mod contours;
pub mod edges;
pub mod grid;
pub mod homography;
pub mod validate;

// Orchestration and results
pub mod detector;
pub mod diagnostics;
pub mod image;
pub mod types;

// Around the core: transport payloads, cube assembly, tool configs.
pub mod boundary;
pub mod config;
pub mod cube_state;

// --- High-level re-exports -------------------------------------------------

pub use crate::detector::{DetectorParams, FaceDetector, FaceJob};
pub use crate::grid::{GridResolver, Strategy};
pub use crate::types::{ColorLabel, FaceColors, FaceIndex, FaceScan, ScanError};

pub use crate::diagnostics::{DebugArtifacts, ScanDiagnostics};
pub use crate::homography::{apply_homography_points, order_corners};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::image::Frame;
    pub use crate::{ColorLabel, DetectorParams, FaceDetector, FaceIndex, FaceScan, ScanError};
}
