use super::hsv::rgb_to_hsv;
use super::rules::ColorRules;
use crate::image::Frame;
use crate::types::{ColorLabel, FaceColors, GridPosition, CENTER_CELL, GRID_CELLS};
use log::debug;
use serde::{Deserialize, Serialize};

/// Half-width `s` of the square patch `[x - s, x + s) × [y - s, y + s)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatchSize {
    /// Constant half-width in pixels.
    Fixed { half_width: u32 },
    /// `min(width, height) / divisor` of the sampled image.
    FractionOfMinSide { divisor: u32 },
}

impl PatchSize {
    pub fn half_width(&self, width: u32, height: u32) -> u32 {
        match *self {
            PatchSize::Fixed { half_width } => half_width,
            PatchSize::FractionOfMinSide { divisor } => width.min(height) / divisor.max(1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerOptions {
    pub patch: PatchSize,
    /// Force the center label to the expected center color of the face.
    pub anchor_center: bool,
}

impl SamplerOptions {
    pub fn prototype() -> Self {
        Self {
            patch: PatchSize::Fixed { half_width: 8 },
            anchor_center: false,
        }
    }

    pub fn refined() -> Self {
        Self {
            patch: PatchSize::FractionOfMinSide { divisor: 15 },
            anchor_center: true,
        }
    }
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self::refined()
    }
}

/// Per-cell sampling record.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSample {
    pub index: usize,
    pub position: GridPosition,
    /// Median `[h, s, v]` of the patch; `None` when the patch was empty.
    pub hsv: Option<[f32; 3]>,
    /// Label read from the pixels, before any center anchoring.
    pub measured: ColorLabel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SampledFace {
    pub cells: Vec<CellSample>,
    /// Final labels, anchored when enabled.
    pub colors: FaceColors,
}

fn median(values: &mut [u8]) -> f32 {
    values.sort_unstable();
    let n = values.len();
    if n % 2 == 1 {
        f32::from(values[n / 2])
    } else {
        (f32::from(values[n / 2 - 1]) + f32::from(values[n / 2])) / 2.0
    }
}

/// Per-channel median HSV of the patch around `pos`, clipped to the image.
pub fn patch_median_hsv(image: &Frame, pos: GridPosition, half_width: u32) -> Option<[f32; 3]> {
    if !(pos.x.is_finite() && pos.y.is_finite()) {
        return None;
    }
    let (w, h) = image.dimensions();
    let s = i64::from(half_width);
    let (cx, cy) = (pos.x.floor() as i64, pos.y.floor() as i64);
    let x0 = (cx - s).clamp(0, i64::from(w));
    let x1 = (cx + s).clamp(0, i64::from(w));
    let y0 = (cy - s).clamp(0, i64::from(h));
    let y1 = (cy + s).clamp(0, i64::from(h));
    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    let count = ((x1 - x0) * (y1 - y0)) as usize;
    let mut hs = Vec::with_capacity(count);
    let mut ss = Vec::with_capacity(count);
    let mut vs = Vec::with_capacity(count);
    for y in y0..y1 {
        for x in x0..x1 {
            let [ph, ps, pv] = rgb_to_hsv(image.get_pixel(x as u32, y as u32).0);
            hs.push(ph);
            ss.push(ps);
            vs.push(pv);
        }
    }
    Some([median(&mut hs), median(&mut ss), median(&mut vs)])
}

/// Sample and label the nine cells of a face.
pub fn sample_face(
    image: &Frame,
    positions: &[GridPosition; GRID_CELLS],
    expected_center: Option<ColorLabel>,
    opts: &SamplerOptions,
    rules: &ColorRules,
) -> SampledFace {
    let (w, h) = image.dimensions();
    let half_width = opts.patch.half_width(w, h);

    let cells: Vec<CellSample> = positions
        .iter()
        .enumerate()
        .map(|(index, &position)| {
            let hsv = patch_median_hsv(image, position, half_width);
            let measured = hsv.map_or(ColorLabel::Unknown, |[ch, cs, cv]| {
                rules.classify(ch, cs, cv)
            });
            CellSample {
                index,
                position,
                hsv,
                measured,
            }
        })
        .collect();

    let mut labels = [ColorLabel::Unknown; GRID_CELLS];
    for cell in &cells {
        labels[cell.index] = cell.measured;
    }
    if opts.anchor_center {
        if let Some(center) = expected_center {
            if labels[CENTER_CELL] != center {
                debug!(
                    "sample_face: center measured {} anchored to {}",
                    labels[CENTER_CELL], center
                );
            }
            labels[CENTER_CELL] = center;
        }
    }

    SampledFace {
        cells,
        colors: FaceColors(labels),
    }
}
