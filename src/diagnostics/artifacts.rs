use super::scan::ScanDiagnostics;
use crate::image::{EdgeMap, Frame};
use crate::types::ColorLabel;
use image::Rgb;
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};

const FACE_OUTLINE: Rgb<u8> = Rgb([0, 255, 0]);
const STICKER_OUTLINE: Rgb<u8> = Rgb([255, 0, 255]);
const MARKER_RIM: Rgb<u8> = Rgb([0, 0, 0]);

/// Intermediate images kept only in debug mode.
#[derive(Clone, Debug)]
pub struct DebugArtifacts {
    pub edges: EdgeMap,
    pub overlay: Frame,
    /// Rectified face (homography strategy only).
    pub warped: Option<Frame>,
}

fn swatch(label: ColorLabel) -> Rgb<u8> {
    match label {
        ColorLabel::White => Rgb([255, 255, 255]),
        ColorLabel::Red => Rgb([220, 0, 0]),
        ColorLabel::Orange => Rgb([255, 140, 0]),
        ColorLabel::Yellow => Rgb([255, 230, 0]),
        ColorLabel::Green => Rgb([0, 180, 0]),
        ColorLabel::Blue => Rgb([0, 60, 255]),
        ColorLabel::Unknown => Rgb([128, 128, 128]),
    }
}

fn draw_polygon(img: &mut Frame, corners: &[[f32; 2]], color: Rgb<u8>) {
    for (i, a) in corners.iter().enumerate() {
        let b = corners[(i + 1) % corners.len()];
        draw_line_segment_mut(img, (a[0], a[1]), (b[0], b[1]), color);
    }
}

/// Draw the detected outline, sticker candidates and grid points (filled
/// with their measured color) onto a copy of the frame.
pub fn render_overlay(frame: &Frame, diag: &ScanDiagnostics) -> Frame {
    let mut out = frame.clone();
    for quad in &diag.sticker_quads {
        draw_polygon(&mut out, &quad.corners, STICKER_OUTLINE);
    }
    if let Some(quad) = &diag.face_quad {
        draw_polygon(&mut out, &quad.corners, FACE_OUTLINE);
    }
    if let Some(points) = diag.grid_in_frame() {
        let radius = (diag.frame_width.min(diag.frame_height) / 60).max(3) as i32;
        for (i, p) in points.iter().enumerate() {
            let label = diag
                .cells
                .get(i)
                .map_or(ColorLabel::Unknown, |c| c.measured);
            let center = (p[0].round() as i32, p[1].round() as i32);
            draw_filled_circle_mut(&mut out, center, radius, swatch(label));
            draw_hollow_circle_mut(&mut out, center, radius, MARKER_RIM);
        }
    }
    out
}
