//! Value types shared by every stage of the face scanner.
//!
//! - [`ColorLabel`]: the closed set of sticker colors (plus `unknown`).
//! - [`GridPosition`] / [`FaceColors`]: the 9 row-major cells of one face.
//! - [`FaceIndex`]: which of the six faces is being scanned, together with the
//!   fixed face-order and center-color tables.
//! - [`ScanError`]: symbolic failure codes surfaced on a [`FaceScan`].
//! - [`FaceScan`]: the atomic output of one detection pass.

use crate::diagnostics::{DebugArtifacts, ScanDiagnostics};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of sticker cells on one face.
pub const GRID_CELLS: usize = 9;
/// Row-major index of the visual center cell.
pub const CENTER_CELL: usize = 4;

/// Face names in scan order; index `i` corresponds to `FaceIndex(i)`.
pub const FACE_ORDER: [&str; 6] = ["front", "right", "back", "left", "top", "bottom"];

/// Center sticker color of each face in scan order.
pub const FACE_CENTER_COLORS: [ColorLabel; 6] = [
    ColorLabel::White,
    ColorLabel::Red,
    ColorLabel::Yellow,
    ColorLabel::Orange,
    ColorLabel::Green,
    ColorLabel::Blue,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorLabel {
    White,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Unknown,
}

impl ColorLabel {
    pub const fn as_str(self) -> &'static str {
        match self {
            ColorLabel::White => "white",
            ColorLabel::Red => "red",
            ColorLabel::Orange => "orange",
            ColorLabel::Yellow => "yellow",
            ColorLabel::Green => "green",
            ColorLabel::Blue => "blue",
            ColorLabel::Unknown => "unknown",
        }
    }

    /// Single-letter code used in the 54-symbol cube state (`X` for unknown).
    pub const fn letter(self) -> char {
        match self {
            ColorLabel::White => 'W',
            ColorLabel::Red => 'R',
            ColorLabel::Orange => 'O',
            ColorLabel::Yellow => 'Y',
            ColorLabel::Green => 'G',
            ColorLabel::Blue => 'B',
            ColorLabel::Unknown => 'X',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'W' => Some(ColorLabel::White),
            'R' => Some(ColorLabel::Red),
            'O' => Some(ColorLabel::Orange),
            'Y' => Some(ColorLabel::Yellow),
            'G' => Some(ColorLabel::Green),
            'B' => Some(ColorLabel::Blue),
            'X' => Some(ColorLabel::Unknown),
            _ => None,
        }
    }

    pub const fn is_unknown(self) -> bool {
        matches!(self, ColorLabel::Unknown)
    }
}

impl fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pixel coordinate of one grid cell, in the image the cell is sampled from
/// (the raw frame for clustering, the rectified face for homography).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: f32,
    pub y: f32,
}

impl GridPosition {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl From<[f32; 2]> for GridPosition {
    fn from(p: [f32; 2]) -> Self {
        Self { x: p[0], y: p[1] }
    }
}

/// The 9 labels of one face in row-major order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceColors(pub [ColorLabel; GRID_CELLS]);

impl FaceColors {
    pub fn as_slice(&self) -> &[ColorLabel] {
        &self.0
    }

    pub fn center(&self) -> ColorLabel {
        self.0[CENTER_CELL]
    }

    pub fn unknown_count(&self) -> usize {
        self.0.iter().filter(|c| c.is_unknown()).count()
    }

    /// Nine-letter code of the face, e.g. `"WWRGWBYOW"`.
    pub fn letters(&self) -> String {
        self.0.iter().map(|c| c.letter()).collect()
    }
}

/// Index of the face being scanned (0–5), in [`FACE_ORDER`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FaceIndex(u8);

impl FaceIndex {
    pub const COUNT: usize = 6;

    pub const ALL: [FaceIndex; 6] = [
        FaceIndex(0),
        FaceIndex(1),
        FaceIndex(2),
        FaceIndex(3),
        FaceIndex(4),
        FaceIndex(5),
    ];

    pub const fn new(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(FaceIndex(index as u8))
        } else {
            None
        }
    }

    /// Map an untrusted index onto a face; anything out of range is treated as
    /// face 0, whose center is white.
    pub fn from_raw_lenient(raw: i64) -> Self {
        usize::try_from(raw)
            .ok()
            .and_then(Self::new)
            .unwrap_or(FaceIndex(0))
    }

    pub const fn get(self) -> usize {
        self.0 as usize
    }

    pub const fn name(self) -> &'static str {
        FACE_ORDER[self.0 as usize]
    }

    pub const fn expected_center(self) -> ColorLabel {
        FACE_CENTER_COLORS[self.0 as usize]
    }
}

impl TryFrom<u8> for FaceIndex {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        FaceIndex::new(value as usize)
            .ok_or_else(|| format!("face index {value} out of range 0..{}", FaceIndex::COUNT))
    }
}

impl From<FaceIndex> for u8 {
    fn from(face: FaceIndex) -> Self {
        face.0
    }
}

impl fmt::Display for FaceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.name())
    }
}

/// Symbolic failure codes. Serialized as the snake_case codes the scanning
/// client switches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanError {
    /// No face-sized near-square quadrilateral in the edge map.
    #[serde(rename = "cube_contour_not_found")]
    ShapeNotFound,
    /// Too few sticker candidates or clustered sticker centers.
    InsufficientStickers,
    /// Degenerate quad or non-invertible perspective transform.
    PerspectiveFailed,
    /// A complete reading rejected by the validator.
    ColorValidationFailed,
    /// Malformed image payload at the transport boundary.
    DecodeFailed,
}

impl ScanError {
    pub const fn code(self) -> &'static str {
        match self {
            ScanError::ShapeNotFound => "cube_contour_not_found",
            ScanError::InsufficientStickers => "insufficient_stickers",
            ScanError::PerspectiveFailed => "perspective_failed",
            ScanError::ColorValidationFailed => "color_validation_failed",
            ScanError::DecodeFailed => "decode_failed",
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ScanError::ShapeNotFound => "no cube face outline found",
            ScanError::InsufficientStickers => "not enough sticker candidates",
            ScanError::PerspectiveFailed => "perspective correction failed",
            ScanError::ColorValidationFailed => "sticker colors failed validation",
            ScanError::DecodeFailed => "image payload could not be decoded",
        };
        write!(f, "{msg} ({})", self.code())
    }
}

impl std::error::Error for ScanError {}

/// Result of one face detection attempt.
///
/// `colors` is present whenever a grid was resolved, including rejected
/// readings, so callers can tell the user which cells were unreadable.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceScan {
    pub success: bool,
    pub valid_detection: bool,
    pub colors: Option<FaceColors>,
    pub error: Option<ScanError>,
    pub face_index: FaceIndex,
    pub diagnostics: ScanDiagnostics,
    /// Edge map, overlay and rectified image; only filled in debug mode.
    #[serde(skip)]
    pub debug: Option<DebugArtifacts>,
}

impl FaceScan {
    pub fn is_accepted(&self) -> bool {
        self.success && self.valid_detection
    }

    pub fn unknown_count(&self) -> Option<usize> {
        self.colors.as_ref().map(FaceColors::unknown_count)
    }
}
