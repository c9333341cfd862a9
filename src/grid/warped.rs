use super::{GridFailure, GridLayout, GridResolver, Strategy};
use crate::contours::{find_face_quad, FaceOptions};
use crate::homography::{rectify, PerspectiveOptions};
use crate::image::{EdgeMap, Frame};
use crate::types::{GridPosition, GRID_CELLS};
use log::debug;

/// Cell centers of a `width × height` rectified face: `((col + ½)·w/3,
/// (row + ½)·h/3)` truncated to whole pixels, row-major.
pub fn canonical_positions(width: u32, height: u32) -> [GridPosition; GRID_CELLS] {
    std::array::from_fn(|i| {
        let (row, col) = ((i / 3) as f32, (i % 3) as f32);
        GridPosition::new(
            ((col + 0.5) * width as f32 / 3.0).floor(),
            ((row + 0.5) * height as f32 / 3.0).floor(),
        )
    })
}

/// Policy B: largest face outline → perspective warp → fixed thirds.
#[derive(Clone, Debug, Default)]
pub struct WarpedGrid {
    pub face: FaceOptions,
    pub perspective: PerspectiveOptions,
}

impl WarpedGrid {
    pub fn new(face: FaceOptions, perspective: PerspectiveOptions) -> Self {
        Self { face, perspective }
    }
}

impl GridResolver for WarpedGrid {
    fn strategy(&self) -> Strategy {
        Strategy::Homography
    }

    fn resolve(&self, frame: &Frame, edges: &EdgeMap) -> Result<GridLayout, GridFailure> {
        let quad = find_face_quad(edges, &self.face)?;
        debug!(
            "WarpedGrid::resolve face area={:.0} aspect={:.3}",
            quad.area,
            quad.aspect_ratio()
        );
        let rectified = match rectify(frame, &quad.corners, &self.perspective) {
            Ok(r) => r,
            Err(error) => {
                return Err(GridFailure {
                    error,
                    face_quad: Some(quad),
                    sticker_quads: Vec::new(),
                })
            }
        };
        let (w, h) = rectified.image.dimensions();
        Ok(GridLayout {
            positions: canonical_positions(w, h),
            rectified: Some(rectified),
            face_quad: Some(quad),
            sticker_quads: Vec::new(),
        })
    }
}
