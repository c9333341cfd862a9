//! Shape finding on the binary edge map.
//!
//! Contours are traced with `imageproc`'s border follower; only outermost
//! borders are kept (grid lines inside a face outline never compete with the
//! outline itself). Each contour is simplified with a closed Douglas–Peucker
//! pass at a tolerance proportional to its perimeter and only 4-vertex
//! results survive as [`Quad`]s.
//!
//! Two filters sit on top:
//! - sticker mode ([`find_sticker_quads`]): many small quads in an area band;
//! - face mode ([`find_face_quad`]): the single largest near-square quad, or
//!   `ShapeNotFound`.

pub mod polygon;
pub mod quads;

pub use polygon::{approximate_closed, arc_length, bounding_box, polygon_area, BoundingBox, Point2};
pub use quads::{
    approximate_quads, external_contours, find_face_quad, find_sticker_quads, FaceOptions, Quad,
    StickerOptions,
};
