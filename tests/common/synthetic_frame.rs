use cube_face_detector::image::Frame;
use image::Rgb;

pub const WHITE: [u8; 3] = [255, 255, 255];
pub const BLACK: [u8; 3] = [0, 0, 0];

/// Uniform frame.
pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
    Frame::from_pixel(width, height, Rgb(rgb))
}

/// Fill the axis-aligned box `[x0, x0 + w) × [y0, y0 + h)`.
pub fn fill_rect(frame: &mut Frame, x0: u32, y0: u32, w: u32, h: u32, rgb: [u8; 3]) {
    for y in y0..(y0 + h).min(frame.height()) {
        for x in x0..(x0 + w).min(frame.width()) {
            frame.put_pixel(x, y, Rgb(rgb));
        }
    }
}

/// A single filled square on a uniform background.
pub fn square(size: u32, bg: [u8; 3], fg: [u8; 3], origin: u32, side: u32) -> Frame {
    let mut frame = solid(size, size, bg);
    fill_rect(&mut frame, origin, origin, side, side, fg);
    frame
}

/// A cube face: dark body square with nine inset stickers, row-major colors.
pub fn cube_face(
    size: u32,
    bg: [u8; 3],
    body: [u8; 3],
    origin: u32,
    cell: u32,
    inset: u32,
    colors: [[u8; 3]; 9],
) -> Frame {
    let mut frame = solid(size, size, bg);
    fill_rect(&mut frame, origin, origin, 3 * cell, 3 * cell, body);
    for (i, rgb) in colors.iter().enumerate() {
        let (row, col) = ((i / 3) as u32, (i % 3) as u32);
        fill_rect(
            &mut frame,
            origin + col * cell + inset,
            origin + row * cell + inset,
            cell - 2 * inset,
            cell - 2 * inset,
            *rgb,
        );
    }
    frame
}

/// Free-standing stickers of side `side` at `pitch` on a uniform background.
/// `present[i]` drops sticker `i` when false.
pub fn sticker_grid(
    size: u32,
    bg: [u8; 3],
    origin: u32,
    side: u32,
    pitch: u32,
    colors: [[u8; 3]; 9],
    present: [bool; 9],
) -> Frame {
    let mut frame = solid(size, size, bg);
    for (i, rgb) in colors.iter().enumerate() {
        if !present[i] {
            continue;
        }
        let (row, col) = ((i / 3) as u32, (i % 3) as u32);
        fill_rect(
            &mut frame,
            origin + col * pitch,
            origin + row * pitch,
            side,
            side,
            *rgb,
        );
    }
    frame
}
