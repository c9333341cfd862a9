//! Frame types and image I/O helpers.
//!
//! The detector consumes decoded 8-bit RGB frames and produces binary edge
//! maps of the same extent; both are plain `image` buffers so callers can
//! hand in whatever their decoder produced.

pub mod io;

/// One decoded camera frame (3 channels, 8 bit, RGB order).
pub type Frame = image::RgbImage;

/// Binary edge map (0 or 255 per pixel), same extent as its frame.
pub type EdgeMap = image::GrayImage;
