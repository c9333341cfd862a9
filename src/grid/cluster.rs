use super::dbscan::{dbscan, largest_cluster};
use super::{GridFailure, GridLayout, GridResolver, Strategy};
use crate::contours::{find_sticker_quads, Point2, StickerOptions};
use crate::image::{EdgeMap, Frame};
use crate::types::{GridPosition, ScanError, GRID_CELLS};
use log::debug;
use serde::{Deserialize, Serialize};

/// How y-sorted sticker centers are split into three rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAssignment {
    /// Row `i` takes every third point starting at `i`. Cheap, but only
    /// approximates a row split for tilted or incomplete grids.
    #[default]
    Interleaved,
    /// Rows are contiguous bands of the y-sorted sequence.
    Banded,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterOptions {
    /// Neighbourhood radius for density clustering, in pixels.
    pub eps_px: f32,
    pub min_samples: usize,
    /// Minimum sticker candidates, and minimum size of the kept cluster.
    pub min_stickers: usize,
    pub row_assignment: RowAssignment,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            eps_px: 40.0,
            min_samples: 1,
            min_stickers: 5,
            row_assignment: RowAssignment::Interleaved,
        }
    }
}

fn centroid(points: &[Point2]) -> Point2 {
    let n = points.len().max(1) as f32;
    let (sx, sy) = points
        .iter()
        .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p[0], sy + p[1]));
    [sx / n, sy / n]
}

fn by_y_then_x(a: &Point2, b: &Point2) -> std::cmp::Ordering {
    a[1].total_cmp(&b[1]).then_with(|| a[0].total_cmp(&b[0]))
}

/// Order sticker centers row-major and force exactly nine of them.
///
/// More than nine: the nine nearest the centroid are kept. Fewer than nine:
/// the row-major sequence is padded with the centroid of the given points.
/// Returns `None` for an empty input.
pub fn grid_from_centers(
    centers: &[Point2],
    rows: RowAssignment,
) -> Option<[GridPosition; GRID_CELLS]> {
    if centers.is_empty() {
        return None;
    }
    let mut points = centers.to_vec();
    if points.len() > GRID_CELLS {
        let c = centroid(&points);
        let d2 = |p: &Point2| (p[0] - c[0]).powi(2) + (p[1] - c[1]).powi(2);
        points.sort_by(|a, b| d2(a).total_cmp(&d2(b)));
        points.truncate(GRID_CELLS);
    }
    points.sort_by(by_y_then_x);

    let n = points.len();
    let buckets: [Vec<Point2>; 3] = std::array::from_fn(|row| match rows {
        RowAssignment::Interleaved => points.iter().skip(row).step_by(3).copied().collect(),
        RowAssignment::Banded => points[row * n / 3..(row + 1) * n / 3].to_vec(),
    });

    let mut ordered: Vec<Point2> = Vec::with_capacity(GRID_CELLS);
    for mut bucket in buckets {
        bucket.sort_by(|a, b| a[0].total_cmp(&b[0]));
        ordered.extend(bucket);
    }
    let pad = centroid(&ordered);
    ordered.resize(GRID_CELLS, pad);

    Some(std::array::from_fn(|i| GridPosition::from(ordered[i])))
}

/// Policy A: sticker quads → density cluster → row-major grid in frame
/// coordinates.
#[derive(Clone, Debug, Default)]
pub struct ClusterGrid {
    pub stickers: StickerOptions,
    pub cluster: ClusterOptions,
}

impl ClusterGrid {
    pub fn new(stickers: StickerOptions, cluster: ClusterOptions) -> Self {
        Self { stickers, cluster }
    }
}

impl GridResolver for ClusterGrid {
    fn strategy(&self) -> Strategy {
        Strategy::Clustering
    }

    fn resolve(&self, _frame: &Frame, edges: &EdgeMap) -> Result<GridLayout, GridFailure> {
        let quads = find_sticker_quads(edges, &self.stickers);
        let insufficient = |quads| GridFailure {
            error: ScanError::InsufficientStickers,
            face_quad: None,
            sticker_quads: quads,
        };
        if quads.len() < self.cluster.min_stickers {
            debug!(
                "ClusterGrid::resolve stickers={} < {}",
                quads.len(),
                self.cluster.min_stickers
            );
            return Err(insufficient(quads));
        }

        let centers: Vec<Point2> = quads.iter().map(|q| q.center()).collect();
        let labels = dbscan(&centers, self.cluster.eps_px, self.cluster.min_samples);
        let members: Vec<Point2> = largest_cluster(&labels)
            .into_iter()
            .map(|i| centers[i])
            .collect();
        debug!(
            "ClusterGrid::resolve stickers={} largest_cluster={}",
            quads.len(),
            members.len()
        );
        if members.len() < self.cluster.min_stickers {
            return Err(insufficient(quads));
        }

        let Some(positions) = grid_from_centers(&members, self.cluster.row_assignment) else {
            return Err(insufficient(quads));
        };
        Ok(GridLayout {
            positions,
            rectified: None,
            face_quad: None,
            sticker_quads: quads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn lattice(origin: f32, pitch: f32) -> Vec<Point2> {
        (0..9)
            .map(|i| {
                let (r, c) = ((i / 3) as f32, (i % 3) as f32);
                [origin + c * pitch, origin + r * pitch]
            })
            .collect()
    }

    #[test]
    fn banded_rows_recover_raster_order() {
        let mut pts = lattice(100.0, 36.0);
        pts.reverse();
        let grid = grid_from_centers(&pts, RowAssignment::Banded).unwrap();
        for (i, p) in grid.iter().enumerate() {
            let want = lattice(100.0, 36.0)[i];
            assert_eq!(p.to_array(), want);
        }
    }

    #[test]
    fn interleaved_rows_take_every_third_point() {
        // Distinct y per point so the sort order is unambiguous.
        let pts: Vec<Point2> = (0..9).map(|i| [(8 - i) as f32 * 10.0, i as f32]).collect();
        let grid = grid_from_centers(&pts, RowAssignment::Interleaved).unwrap();
        // Row 0 holds sorted indices 0, 3, 6, reordered by x.
        let row0: Vec<f32> = grid[..3].iter().map(|p| p.y).collect();
        assert_eq!(row0, vec![6.0, 3.0, 0.0]);
    }

    #[test]
    fn short_input_is_padded_with_centroid() {
        let pts = lattice(0.0, 30.0)[..7].to_vec();
        let grid = grid_from_centers(&pts, RowAssignment::Banded).unwrap();
        let c = centroid(&pts);
        assert_abs_diff_eq!(grid[7].x, c[0], epsilon = 1e-4);
        assert_abs_diff_eq!(grid[8].y, c[1], epsilon = 1e-4);
        assert_eq!(grid.len(), GRID_CELLS);
    }

    #[test]
    fn five_to_eight_points_keep_every_input_and_pad_the_tail() {
        for n in 5..=8 {
            for rows in [RowAssignment::Banded, RowAssignment::Interleaved] {
                let pts = lattice(50.0, 30.0)[..n].to_vec();
                let grid = grid_from_centers(&pts, rows).unwrap();
                let c = centroid(&pts);
                for p in &pts {
                    let hits = grid[..n]
                        .iter()
                        .filter(|g| g.x == p[0] && g.y == p[1])
                        .count();
                    assert_eq!(hits, 1, "n={n} rows={rows:?} point={p:?}");
                }
                for g in &grid[n..] {
                    assert_abs_diff_eq!(g.x, c[0], epsilon = 1e-4);
                    assert_abs_diff_eq!(g.y, c[1], epsilon = 1e-4);
                }
            }
        }
    }

    #[test]
    fn extra_points_keep_the_nine_nearest_to_centroid() {
        let mut pts = lattice(100.0, 36.0);
        pts.push([400.0, 400.0]);
        let grid = grid_from_centers(&pts, RowAssignment::Banded).unwrap();
        assert!(grid.iter().all(|p| p.x < 200.0 && p.y < 200.0));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(grid_from_centers(&[], RowAssignment::Interleaved).is_none());
    }

    #[test]
    fn blank_edge_map_is_insufficient() {
        let frame = Frame::new(64, 64);
        let edges = EdgeMap::new(64, 64);
        let err = ClusterGrid::default().resolve(&frame, &edges).unwrap_err();
        assert_eq!(err.error, ScanError::InsufficientStickers);
        assert!(err.sticker_quads.is_empty());
    }
}
