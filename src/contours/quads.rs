use super::polygon::{approximate_closed, arc_length, bounding_box, polygon_area, Point2};
use crate::image::EdgeMap;
use crate::types::ScanError;
use imageproc::contours::{find_contours, BorderType};
use log::debug;
use serde::{Deserialize, Serialize};

/// Four-vertex polygon approximating a contour, in tracing order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quad {
    pub corners: [Point2; 4],
    pub area: f32,
}

impl Quad {
    pub fn new(corners: [Point2; 4]) -> Self {
        let area = polygon_area(&corners);
        Self { corners, area }
    }

    pub fn center(&self) -> Point2 {
        let (sx, sy) = self
            .corners
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
        [sx / 4.0, sy / 4.0]
    }

    /// Bounding-box width over height; `0` for a flat box.
    pub fn aspect_ratio(&self) -> f32 {
        match bounding_box(&self.corners) {
            Some(bb) if bb.height() > 0.0 => bb.width() / bb.height(),
            _ => 0.0,
        }
    }
}

/// Sticker-candidate filter: small quads inside an open area band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerOptions {
    pub min_area: f32,
    pub max_area: f32,
    /// Simplification tolerance as a fraction of the contour perimeter.
    pub epsilon_frac: f32,
}

impl Default for StickerOptions {
    fn default() -> Self {
        Self {
            min_area: 250.0,
            max_area: 5000.0,
            epsilon_frac: 0.04,
        }
    }
}

/// Face-candidate filter: one large near-square quad.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceOptions {
    pub min_area: f32,
    pub min_aspect: f32,
    pub max_aspect: f32,
    pub epsilon_frac: f32,
}

impl Default for FaceOptions {
    fn default() -> Self {
        Self {
            min_area: 10_000.0,
            min_aspect: 0.7,
            max_aspect: 1.3,
            epsilon_frac: 0.02,
        }
    }
}

/// Outermost contours of the edge map; nested borders (holes and anything
/// inside them) are skipped.
pub fn external_contours(edges: &EdgeMap) -> Vec<Vec<Point2>> {
    find_contours::<i32>(edges)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            c.points
                .iter()
                .map(|p| [p.x as f32, p.y as f32])
                .collect()
        })
        .collect()
}

/// Simplify every external contour and keep the 4-vertex results.
pub fn approximate_quads(edges: &EdgeMap, epsilon_frac: f32) -> Vec<Quad> {
    let contours = external_contours(edges);
    let total = contours.len();
    let quads: Vec<Quad> = contours
        .into_iter()
        .filter(|c| c.len() >= 4)
        .filter_map(|c| {
            let eps = epsilon_frac * arc_length(&c, true);
            let poly = approximate_closed(&c, eps);
            <[Point2; 4]>::try_from(poly.as_slice()).ok().map(Quad::new)
        })
        .collect();
    debug!(
        "approximate_quads: contours={} quads={} eps_frac={:.3}",
        total,
        quads.len(),
        epsilon_frac
    );
    quads
}

/// Sticker-mode shape finding.
pub fn find_sticker_quads(edges: &EdgeMap, opts: &StickerOptions) -> Vec<Quad> {
    approximate_quads(edges, opts.epsilon_frac)
        .into_iter()
        .filter(|q| q.area > opts.min_area && q.area < opts.max_area)
        .collect()
}

/// Face-mode shape finding: the largest near-square quad above the area floor.
pub fn find_face_quad(edges: &EdgeMap, opts: &FaceOptions) -> Result<Quad, ScanError> {
    approximate_quads(edges, opts.epsilon_frac)
        .into_iter()
        .filter(|q| q.area > opts.min_area)
        .filter(|q| {
            let ar = q.aspect_ratio();
            ar > opts.min_aspect && ar < opts.max_aspect
        })
        .max_by(|a, b| a.area.total_cmp(&b.area))
        .ok_or(ScanError::ShapeNotFound)
}
