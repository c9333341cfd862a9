//! Planar polygon helpers: arc length, area, bounding box and closed-curve
//! Douglas–Peucker simplification, on top of `imageproc::geometry`.

use imageproc::geometry;
use imageproc::point::Point;

/// A 2-D point in pixel coordinates.
pub type Point2 = [f32; 2];

#[inline]
fn dist(a: Point2, b: Point2) -> f32 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

fn to_points(points: &[Point2]) -> Vec<Point<f32>> {
    points.iter().map(|p| Point::new(p[0], p[1])).collect()
}

/// Perimeter of a polyline; `closed` adds the segment back to the start.
pub fn arc_length(points: &[Point2], closed: bool) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }
    geometry::arc_length(&to_points(points), closed) as f32
}

/// Unsigned area of a closed polygon.
pub fn polygon_area(points: &[Point2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    geometry::contour_area(&to_points(points)).abs() as f32
}

/// Axis-aligned pixel bounding box. Width and height count pixels inclusively,
/// so a single point has extent 1×1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl BoundingBox {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x + 1.0
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y + 1.0
    }
}

pub fn bounding_box(points: &[Point2]) -> Option<BoundingBox> {
    let first = points.first()?;
    let mut bb = BoundingBox {
        min_x: first[0],
        min_y: first[1],
        max_x: first[0],
        max_y: first[1],
    };
    for p in &points[1..] {
        bb.min_x = bb.min_x.min(p[0]);
        bb.min_y = bb.min_y.min(p[1]);
        bb.max_x = bb.max_x.max(p[0]);
        bb.max_y = bb.max_y.max(p[1]);
    }
    Some(bb)
}

fn farthest_from(points: &[Point2], origin: Point2) -> usize {
    let mut best = 0usize;
    let mut best_d = -1.0f32;
    for (i, &p) in points.iter().enumerate() {
        let d = dist(p, origin);
        if d > best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

/// Douglas–Peucker on an open chain. Both endpoints are always kept.
fn simplify_chain(chain: &[Point2], epsilon: f32) -> Vec<Point2> {
    // approximate_polygon_dp panics on a non-positive epsilon.
    if chain.len() < 3 || epsilon.is_nan() || epsilon <= 0.0 {
        return chain.to_vec();
    }
    geometry::approximate_polygon_dp(&to_points(chain), epsilon as f64, false)
        .into_iter()
        .map(|p| [p.x, p.y])
        .collect()
}

/// Simplify a closed curve so that no dropped point lies farther than
/// `epsilon` from the kept polygon.
///
/// `approximate_polygon_dp` in closed mode anchors on the first point, so a
/// contour traced from the middle of a side keeps a spurious vertex there.
/// Instead the curve is split at two mutually distant points (an approximate
/// diameter) and each half is simplified as an open chain. The result then
/// does not depend on where the contour tracer happened to start.
pub fn approximate_closed(points: &[Point2], epsilon: f32) -> Vec<Point2> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let a = farthest_from(points, points[0]);
    let b = farthest_from(points, points[a]);
    if a == b {
        return vec![points[a]];
    }
    let (lo, hi) = (a.min(b), a.max(b));

    let first: Vec<Point2> = points[lo..=hi].to_vec();
    let second: Vec<Point2> = points[hi..]
        .iter()
        .chain(points[..=lo].iter())
        .copied()
        .collect();

    let mut out = Vec::new();
    for chain in [&first, &second] {
        let mut kept = simplify_chain(chain, epsilon);
        // The chain's last point is the next chain's first point.
        kept.pop();
        out.extend(kept);
    }
    out
}
