//! Assembly of six accepted face readings into a full cube state.
//!
//! Two encodings are offered:
//! - the scan-order state: 54 color letters (`W R O Y G B`) in face order
//!   front, right, back, left, top, bottom;
//! - solver facelets: 54 face letters (`U R F D L B`), faces ordered
//!   U, R, F, D, L, B and located by their center color.

use crate::types::{ColorLabel, FaceColors, FaceIndex, FaceScan, CENTER_CELL, GRID_CELLS};
use std::fmt;

/// Solver face letters in solver order with the center color of each.
const SOLVER_FACES: [(char, ColorLabel); 6] = [
    ('U', ColorLabel::White),
    ('R', ColorLabel::Orange),
    ('F', ColorLabel::Green),
    ('D', ColorLabel::Yellow),
    ('L', ColorLabel::Red),
    ('B', ColorLabel::Blue),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CubeStateError {
    WrongFaceCount(usize),
    DuplicateFace(FaceIndex),
    Rejected(FaceIndex),
    UnknownSticker { face: FaceIndex, cell: usize },
    CenterNotFound(ColorLabel),
}

impl fmt::Display for CubeStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CubeStateError::WrongFaceCount(n) => write!(f, "expected 6 faces, got {n}"),
            CubeStateError::DuplicateFace(face) => write!(f, "face {face} scanned twice"),
            CubeStateError::Rejected(face) => write!(f, "face {face} was not accepted"),
            CubeStateError::UnknownSticker { face, cell } => {
                write!(f, "face {face} has an unreadable sticker at cell {cell}")
            }
            CubeStateError::CenterNotFound(color) => {
                write!(f, "no face has a {color} center")
            }
        }
    }
}

impl std::error::Error for CubeStateError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CubeState {
    faces: [FaceColors; FaceIndex::COUNT],
}

impl CubeState {
    /// Faces in scan order. Rejects unreadable stickers.
    pub fn from_faces(faces: [FaceColors; FaceIndex::COUNT]) -> Result<Self, CubeStateError> {
        for (face, colors) in FaceIndex::ALL.iter().zip(faces.iter()) {
            if let Some(cell) = colors.as_slice().iter().position(|c| c.is_unknown()) {
                return Err(CubeStateError::UnknownSticker { face: *face, cell });
            }
        }
        Ok(Self { faces })
    }

    /// Six accepted scans, one per face index, in any order.
    pub fn from_scans(scans: &[FaceScan]) -> Result<Self, CubeStateError> {
        if scans.len() != FaceIndex::COUNT {
            return Err(CubeStateError::WrongFaceCount(scans.len()));
        }
        let mut slots: [Option<FaceColors>; FaceIndex::COUNT] = [None; FaceIndex::COUNT];
        for scan in scans {
            let face = scan.face_index;
            let colors = match scan.colors {
                Some(colors) if scan.is_accepted() => colors,
                _ => return Err(CubeStateError::Rejected(face)),
            };
            let slot = &mut slots[face.get()];
            if slot.is_some() {
                return Err(CubeStateError::DuplicateFace(face));
            }
            *slot = Some(colors);
        }
        let mut faces = [FaceColors([ColorLabel::Unknown; GRID_CELLS]); FaceIndex::COUNT];
        for (dst, (slot, face)) in faces.iter_mut().zip(slots.iter().zip(FaceIndex::ALL)) {
            *dst = slot.ok_or(CubeStateError::Rejected(face))?;
        }
        Self::from_faces(faces)
    }

    pub fn face(&self, face: FaceIndex) -> &FaceColors {
        &self.faces[face.get()]
    }

    /// 54 color letters in scan order.
    pub fn to_state_string(&self) -> String {
        self.faces.iter().map(FaceColors::letters).collect()
    }

    /// 54 solver facelet letters, faces in U R F D L B order.
    pub fn to_solver_facelets(&self) -> Result<String, CubeStateError> {
        let letter_for = |color: ColorLabel| {
            SOLVER_FACES
                .iter()
                .find(|(_, c)| *c == color)
                .map(|(l, _)| *l)
        };
        let mut out = String::with_capacity(FaceIndex::COUNT * GRID_CELLS);
        for (_, center) in SOLVER_FACES {
            let colors = self
                .faces
                .iter()
                .find(|f| f.as_slice()[CENTER_CELL] == center)
                .ok_or(CubeStateError::CenterNotFound(center))?;
            for color in colors.as_slice() {
                out.push(letter_for(*color).ok_or(CubeStateError::CenterNotFound(*color))?);
            }
        }
        Ok(out)
    }
}
