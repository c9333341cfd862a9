//! Perspective normalization: corner ordering, four-point homography and
//! rectifying warp.
//!
//! The rectified image is the axis-aligned `w × h` view of the quad, where
//! `w`/`h` are the longer of the opposite edge lengths. Degenerate quads
//! (collapsed edges, duplicated corners, non-invertible transforms) are
//! reported as [`ScanError::PerspectiveFailed`] rather than producing an
//! empty or garbage image.

use crate::contours::Point2;
use crate::image::Frame;
use crate::types::ScanError;
use image::Rgb;
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use log::debug;
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

const EPS: f32 = 1e-9;
const DET_EPS: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerspectiveOptions {
    /// Smallest accepted rectified width/height in pixels.
    pub min_side_px: u32,
    /// Largest accepted rectified width/height in pixels.
    pub max_side_px: u32,
}

impl Default for PerspectiveOptions {
    fn default() -> Self {
        Self {
            min_side_px: 2,
            max_side_px: 8192,
        }
    }
}

/// A rectified face together with the frame→rectified transform.
#[derive(Clone, Debug)]
pub struct Rectified {
    pub image: Frame,
    /// Maps frame pixels to rectified pixels.
    pub homography: Matrix3<f32>,
    /// Source corners as top-left, top-right, bottom-right, bottom-left.
    pub corners: [Point2; 4],
}

pub fn apply_homography_points(h: &Matrix3<f32>, pts: &[[f32; 2]]) -> Option<Vec<[f32; 2]>> {
    let mut out = Vec::with_capacity(pts.len());
    for &p in pts {
        let v = h * Vector3::new(p[0], p[1], 1.0);
        let w = v[2];
        if !w.is_finite() || w.abs() <= EPS || !v[0].is_finite() || !v[1].is_finite() {
            return None;
        }
        out.push([v[0] / w, v[1] / w]);
    }
    Some(out)
}

fn by_score(score: impl Fn(&Point2) -> f32) -> impl Fn(&Point2, &Point2) -> Ordering {
    move |a, b| {
        score(a)
            .total_cmp(&score(b))
            .then_with(|| a[0].total_cmp(&b[0]))
            .then_with(|| a[1].total_cmp(&b[1]))
    }
}

/// Order 4 corners as top-left, top-right, bottom-right, bottom-left.
///
/// Top-left minimizes `x + y` and bottom-right maximizes it. Of the two
/// remaining points, top-right has the smaller `y − x` and bottom-left the
/// larger. Each input point is used exactly once, even when scores tie (a
/// square rotated by 45° ties on both sums and differences).
///
/// Ties break on `(x, y)`, so the output does not depend on the winding or
/// starting vertex of the input.
pub fn order_corners(points: &[Point2; 4]) -> [Point2; 4] {
    let mut by_sum = *points;
    by_sum.sort_by(by_score(|p| p[0] + p[1]));
    let [tl, mut rest_a, mut rest_b, br] = by_sum;
    if by_score(|p| p[1] - p[0])(&rest_a, &rest_b) == Ordering::Greater {
        std::mem::swap(&mut rest_a, &mut rest_b);
    }
    [tl, rest_a, br, rest_b]
}

#[inline]
fn edge_len(a: Point2, b: Point2) -> f32 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

/// Rectified extent for ordered corners: the longer of each pair of opposite
/// edges, floored to whole pixels.
pub fn rectified_size(ordered: &[Point2; 4]) -> (u32, u32) {
    let [tl, tr, br, bl] = *ordered;
    let width = edge_len(br, bl).max(edge_len(tr, tl));
    let height = edge_len(tr, br).max(edge_len(tl, bl));
    let clamp = |v: f32| if v.is_finite() && v > 0.0 { v.floor() as u32 } else { 0 };
    (clamp(width), clamp(height))
}

/// Solve the homography mapping `src[i]` to `dst[i]` for four
/// correspondences (DLT with `h33 = 1`).
pub fn homography_from_quad(src: &[Point2; 4], dst: &[Point2; 4]) -> Option<Matrix3<f32>> {
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
        let (x, y) = (s[0] as f64, s[1] as f64);
        let (u, v) = (d[0] as f64, d[1] as f64);
        let r = 2 * i;
        a[(r, 0)] = x;
        a[(r, 1)] = y;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -u * x;
        a[(r, 7)] = -u * y;
        b[r] = u;
        a[(r + 1, 3)] = x;
        a[(r + 1, 4)] = y;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -v * x;
        a[(r + 1, 7)] = -v * y;
        b[r + 1] = v;
    }
    let h = a.lu().solve(&b)?;
    if h.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let m = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);
    if m.determinant().abs() <= DET_EPS {
        return None;
    }
    m.try_inverse()?;
    Some(m.cast::<f32>())
}

/// Warp the quad spanned by `corners` (any order) into an axis-aligned image.
pub fn rectify(
    frame: &Frame,
    corners: &[Point2; 4],
    opts: &PerspectiveOptions,
) -> Result<Rectified, ScanError> {
    if corners.iter().flatten().any(|v| !v.is_finite()) {
        return Err(ScanError::PerspectiveFailed);
    }
    let ordered = order_corners(corners);
    let (width, height) = rectified_size(&ordered);
    if width < opts.min_side_px
        || height < opts.min_side_px
        || width > opts.max_side_px
        || height > opts.max_side_px
    {
        debug!("rectify: degenerate extent {}x{}", width, height);
        return Err(ScanError::PerspectiveFailed);
    }

    let (wm1, hm1) = ((width - 1) as f32, (height - 1) as f32);
    let dst = [[0.0, 0.0], [wm1, 0.0], [wm1, hm1], [0.0, hm1]];
    let homography = homography_from_quad(&ordered, &dst).ok_or_else(|| {
        debug!("rectify: singular homography for corners {:?}", ordered);
        ScanError::PerspectiveFailed
    })?;

    let mut row_major = [0.0f32; 9];
    for r in 0..3 {
        for c in 0..3 {
            row_major[3 * r + c] = homography[(r, c)];
        }
    }
    let projection = Projection::from_matrix(row_major).ok_or(ScanError::PerspectiveFailed)?;

    let mut image = Frame::new(width, height);
    warp_into(
        frame,
        &projection,
        Interpolation::Bilinear,
        Rgb([0, 0, 0]),
        &mut image,
    );

    Ok(Rectified {
        image,
        homography,
        corners: ordered,
    })
}
