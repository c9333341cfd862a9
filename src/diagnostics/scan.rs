use super::timing::TimingBreakdown;
use crate::color::CellSample;
use crate::contours::Quad;
use crate::grid::Strategy;
use crate::types::{GridPosition, GRID_CELLS};
use nalgebra::Matrix3;
use serde::Serialize;

/// Everything a caller may want to inspect about one scan beyond the labels.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanDiagnostics {
    pub strategy: Strategy,
    pub frame_width: u32,
    pub frame_height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_quad: Option<Quad>,
    pub sticker_quads: Vec<Quad>,
    /// Resolved positions, in the coordinates of the sampled image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<[GridPosition; GRID_CELLS]>,
    pub cells: Vec<CellSample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unknown_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rectified_size: Option<[u32; 2]>,
    /// Frame → rectified transform (homography strategy only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homography: Option<Matrix3<f32>>,
    pub timings: TimingBreakdown,
    /// Message of a fault caught inside the pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_error: Option<String>,
}

impl ScanDiagnostics {
    pub fn new(strategy: Strategy, frame_width: u32, frame_height: u32) -> Self {
        Self {
            strategy,
            frame_width,
            frame_height,
            ..Default::default()
        }
    }

    /// Grid positions mapped back into frame coordinates.
    pub fn grid_in_frame(&self) -> Option<Vec<[f32; 2]>> {
        let grid = self.grid.as_ref()?;
        let pts: Vec<[f32; 2]> = grid.iter().map(|p| p.to_array()).collect();
        match &self.homography {
            Some(h) => {
                let inv = h.try_inverse()?;
                crate::homography::apply_homography_points(&inv, &pts)
            }
            None => Some(pts),
        }
    }
}
