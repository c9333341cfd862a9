//! Diagnostics attached to every [`FaceScan`](crate::types::FaceScan).
//!
//! [`ScanDiagnostics`] is always filled and serializable; [`DebugArtifacts`]
//! holds the intermediate images and is only produced in debug mode.

pub mod artifacts;
pub mod scan;
pub mod timing;

pub use artifacts::{render_overlay, DebugArtifacts};
pub use scan::ScanDiagnostics;
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
