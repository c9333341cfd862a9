//! Grid resolution: nine ordered sticker positions for one face.
//!
//! Two interchangeable resolvers implement [`GridResolver`]:
//! - [`ClusterGrid`]: density-clusters small sticker quads found directly in
//!   the frame and orders their centers into rows.
//! - [`WarpedGrid`]: finds the face outline, rectifies it and places the
//!   cells at fixed thirds of the rectified image.
//!
//! Positions live in the coordinate frame of the image they should be
//! sampled from; see [`GridLayout::sampling_image`].

pub mod cluster;
pub mod dbscan;
pub mod warped;

pub use cluster::{grid_from_centers, ClusterGrid, ClusterOptions, RowAssignment};
pub use dbscan::{dbscan, largest_cluster};
pub use warped::{canonical_positions, WarpedGrid};

use crate::contours::Quad;
use crate::homography::Rectified;
use crate::image::{EdgeMap, Frame};
use crate::types::{GridPosition, ScanError, GRID_CELLS};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Clustering,
    #[default]
    Homography,
}

/// A resolved grid plus the geometry that produced it.
#[derive(Clone, Debug)]
pub struct GridLayout {
    pub positions: [GridPosition; GRID_CELLS],
    /// Present when positions refer to a rectified face image.
    pub rectified: Option<Rectified>,
    pub face_quad: Option<Quad>,
    pub sticker_quads: Vec<Quad>,
}

impl GridLayout {
    /// The image `positions` are expressed in.
    pub fn sampling_image<'a>(&'a self, frame: &'a Frame) -> &'a Frame {
        self.rectified.as_ref().map_or(frame, |r| &r.image)
    }
}

/// Failure carrying whatever geometry was found before giving up.
#[derive(Clone, Debug)]
pub struct GridFailure {
    pub error: ScanError,
    pub face_quad: Option<Quad>,
    pub sticker_quads: Vec<Quad>,
}

impl From<ScanError> for GridFailure {
    fn from(error: ScanError) -> Self {
        Self {
            error,
            face_quad: None,
            sticker_quads: Vec::new(),
        }
    }
}

/// Maps a frame and its edge map to nine row-major grid positions.
pub trait GridResolver: Send + Sync {
    fn strategy(&self) -> Strategy;
    fn resolve(&self, frame: &Frame, edges: &EdgeMap) -> Result<GridLayout, GridFailure>;
}
