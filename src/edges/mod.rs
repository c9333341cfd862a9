//! Frame preprocessing: grayscale, blur, Canny edges and morphological
//! gap closing.
//!
//! The output is a binary edge map with the same extent as the input frame.
//! The shape finder traces contours on it, so the closing step matters: the
//! grid lines between stickers and the outline of the cube body must form
//! closed rings for the contour tracer to see them as quadrilaterals.
//!
//! Two presets mirror the two grid strategies:
//! - `prototype`: light blur, low Canny floor and dilation only, tuned for
//!   isolated sticker outlines.
//! - `refined`: stronger blur and a dilate/erode pair (closing) so that the
//!   outer face outline stays thin but gap-free.
//!
//! Degenerate frames (smaller than 3×3) produce an all-zero map.

use crate::image::{EdgeMap, Frame};
use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{dilate, erode};
use serde::{Deserialize, Serialize};

const MIN_EXTENT: u32 = 3;

/// Knobs for the preprocessing stage.
///
/// - `blur_sigma`: Gaussian sigma; 1.1 ≈ a 5×5 kernel, 1.4 ≈ 7×7. `0` skips.
/// - `canny_low` / `canny_high`: hysteresis thresholds on gradient magnitude.
/// - `dilate_radius` / `erode_radius`: half-size of the square structuring
///   element (radius 2 = 5×5, equivalent to two 3×3 passes). `0` skips.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    pub blur_sigma: f32,
    pub canny_low: f32,
    pub canny_high: f32,
    pub dilate_radius: u8,
    pub erode_radius: u8,
}

impl PreprocessOptions {
    pub fn prototype() -> Self {
        Self {
            blur_sigma: 1.1,
            canny_low: 30.0,
            canny_high: 150.0,
            dilate_radius: 2,
            erode_radius: 0,
        }
    }

    pub fn refined() -> Self {
        Self {
            blur_sigma: 1.4,
            canny_low: 50.0,
            canny_high: 150.0,
            dilate_radius: 2,
            erode_radius: 2,
        }
    }
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self::refined()
    }
}

/// Single-channel intensity (Rec. 709 luma).
pub fn to_gray(frame: &Frame) -> GrayImage {
    image::imageops::grayscale(frame)
}

/// Produce the binary edge map for `frame`.
pub fn edge_map(frame: &Frame, opts: &PreprocessOptions) -> EdgeMap {
    let (w, h) = frame.dimensions();
    if w < MIN_EXTENT || h < MIN_EXTENT {
        return GrayImage::new(w, h);
    }

    let gray = to_gray(frame);
    let smoothed = if opts.blur_sigma > 0.0 {
        gaussian_blur_f32(&gray, opts.blur_sigma)
    } else {
        gray
    };

    let high = opts.canny_high.max(opts.canny_low);
    let mut edges = canny(&smoothed, opts.canny_low, high);
    if opts.dilate_radius > 0 {
        edges = dilate(&edges, Norm::LInf, opts.dilate_radius);
    }
    if opts.erode_radius > 0 {
        edges = erode(&edges, Norm::LInf, opts.erode_radius);
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn square_frame(size: u32, lo: u32, hi: u32, fg: [u8; 3]) -> Frame {
        Frame::from_fn(size, size, |x, y| {
            if (lo..hi).contains(&x) && (lo..hi).contains(&y) {
                Rgb(fg)
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn flat_frame_has_no_edges() {
        let frame = Frame::from_pixel(64, 48, Rgb([120, 30, 200]));
        let edges = edge_map(&frame, &PreprocessOptions::refined());
        assert_eq!(edges.dimensions(), (64, 48));
        assert!(edges.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn tiny_frame_yields_blank_map_of_same_extent() {
        let frame = Frame::from_pixel(2, 5, Rgb([255, 255, 255]));
        let edges = edge_map(&frame, &PreprocessOptions::prototype());
        assert_eq!(edges.dimensions(), (2, 5));
        assert!(edges.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn bright_square_outline_is_detected() {
        let frame = square_frame(96, 24, 72, [240, 240, 240]);
        for opts in [PreprocessOptions::prototype(), PreprocessOptions::refined()] {
            let edges = edge_map(&frame, &opts);
            // Boundary column crosses the outline.
            let hits = (30..66)
                .filter(|&y| (20..28).any(|x| edges.get_pixel(x, y)[0] > 0))
                .count();
            assert!(hits > 30, "outline mostly missing: {hits}");
            // Interior and far background stay clean.
            assert_eq!(edges.get_pixel(48, 48)[0], 0);
            assert_eq!(edges.get_pixel(4, 4)[0], 0);
        }
    }
}
