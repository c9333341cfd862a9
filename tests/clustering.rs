mod common;

use common::init_logger;
use common::synthetic_frame::{fill_rect, solid, sticker_grid, BLACK};
use cube_face_detector::grid::RowAssignment;
use cube_face_detector::{ColorLabel, DetectorParams, FaceDetector, FaceIndex, ScanError, Strategy};

const W: [u8; 3] = [240, 240, 240];
// Hue 36 on the 8-bit scale; pure yellow (30) is orange to the prototype rules.
const Y: [u8; 3] = [200, 255, 0];
const G: [u8; 3] = [0, 200, 0];
const O: [u8; 3] = [255, 140, 0];

const STICKERS: [[u8; 3]; 9] = [W, Y, G, O, W, Y, G, O, W];
const ALL_PRESENT: [bool; 9] = [true; 9];

fn clustering(rows: RowAssignment) -> FaceDetector {
    let mut params = DetectorParams::prototype();
    params.cluster.row_assignment = rows;
    FaceDetector::new(params)
}

fn front() -> FaceIndex {
    FaceIndex::new(0).unwrap()
}

#[test]
fn banded_rows_read_stickers_in_raster_order() {
    init_logger();
    let frame = sticker_grid(320, BLACK, 111, 26, 36, STICKERS, ALL_PRESENT);
    let detector = clustering(RowAssignment::Banded);
    assert_eq!(detector.strategy(), Strategy::Clustering);

    let scan = detector.process(&frame, front(), false);
    assert!(scan.success, "error={:?}", scan.error);
    use ColorLabel::*;
    assert_eq!(
        scan.colors.unwrap().0,
        [White, Yellow, Green, Orange, White, Yellow, Green, Orange, White]
    );

    let diag = &scan.diagnostics;
    assert_eq!(diag.sticker_quads.len(), 9);
    assert!(diag.face_quad.is_none());
    assert!(diag.rectified_size.is_none());
    let grid = diag.grid.unwrap();
    // Positions are in frame coordinates, near the sticker centers.
    assert!((grid[0].x - 123.5).abs() < 4.0 && (grid[0].y - 123.5).abs() < 4.0, "{:?}", grid[0]);
    assert!((grid[8].x - 195.5).abs() < 4.0 && (grid[8].y - 195.5).abs() < 4.0, "{:?}", grid[8]);
}

#[test]
fn interleaved_rows_read_the_same_stickers() {
    init_logger();
    let frame = sticker_grid(320, BLACK, 111, 26, 36, STICKERS, ALL_PRESENT);
    let scan = clustering(RowAssignment::Interleaved).process(&frame, front(), false);
    assert!(scan.success, "error={:?}", scan.error);

    let count = |c: ColorLabel| scan.colors.unwrap().0.iter().filter(|l| **l == c).count();
    assert_eq!(count(ColorLabel::White), 3);
    assert_eq!(count(ColorLabel::Yellow), 2);
    assert_eq!(count(ColorLabel::Green), 2);
    assert_eq!(count(ColorLabel::Orange), 2);
}

#[test]
fn four_stickers_are_not_enough() {
    init_logger();
    let present = [true, true, false, true, true, false, false, false, false];
    let frame = sticker_grid(320, BLACK, 111, 26, 36, STICKERS, present);
    let scan = clustering(RowAssignment::Banded).process(&frame, front(), false);
    assert_eq!(scan.error, Some(ScanError::InsufficientStickers));
    assert!(scan.colors.is_none());
    assert_eq!(scan.diagnostics.sticker_quads.len(), 4);
}

#[test]
fn split_clusters_below_five_are_rejected() {
    init_logger();
    let mut frame = solid(320, 320, BLACK);
    // Two groups of three, far beyond the clustering radius from each other.
    for (x, y) in [(20, 20), (56, 20), (20, 56), (220, 220), (256, 220), (220, 256)] {
        fill_rect(&mut frame, x, y, 26, 26, W);
    }
    let scan = clustering(RowAssignment::Banded).process(&frame, front(), false);
    assert_eq!(scan.diagnostics.sticker_quads.len(), 6);
    assert_eq!(scan.error, Some(ScanError::InsufficientStickers));
    assert!(scan.colors.is_none());
}

#[test]
fn missing_stickers_are_padded_to_nine_cells() {
    init_logger();
    let present = [true, true, true, true, true, true, true, false, false];
    let frame = sticker_grid(320, BLACK, 111, 26, 36, STICKERS, present);
    let scan = clustering(RowAssignment::Banded).process(&frame, front(), false);
    let colors = scan.colors.expect("grid resolved");
    assert_eq!(colors.0.len(), 9);
    assert_eq!(scan.diagnostics.cells.len(), 9);
    assert!(scan.success, "error={:?}", scan.error);
}

#[test]
fn black_frame_has_no_stickers() {
    init_logger();
    let scan = FaceDetector::new(DetectorParams::prototype()).process(
        &solid(320, 320, BLACK),
        front(),
        false,
    );
    assert_eq!(scan.error, Some(ScanError::InsufficientStickers));
    assert!(!scan.success);
    let json = serde_json::to_value(&scan).unwrap();
    assert_eq!(json["error"], "insufficient_stickers");
    assert_eq!(json["diagnostics"]["strategy"], "clustering");
}
