//! Parameter bundle for the face detector.
//!
//! Two presets mirror the two grid strategies. `prototype` is the original
//! sticker-clustering pipeline with loose validation; `refined` locates the
//! whole face outline, rectifies it and validates strictly. Any field can be
//! overridden from JSON; missing fields fall back to the `refined` preset
//! (the scan config seeds them from its strategy's preset instead).

use crate::color::{ColorRules, SamplerOptions};
use crate::contours::{FaceOptions, StickerOptions};
use crate::edges::PreprocessOptions;
use crate::grid::{ClusterOptions, Strategy};
use crate::homography::PerspectiveOptions;
use crate::validate::ValidatorOptions;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    pub strategy: Strategy,
    pub preprocess: PreprocessOptions,
    /// Sticker-mode shape filter (clustering strategy).
    pub stickers: StickerOptions,
    /// Face-mode shape filter (homography strategy).
    pub face: FaceOptions,
    pub cluster: ClusterOptions,
    pub perspective: PerspectiveOptions,
    pub sampler: SamplerOptions,
    pub rules: ColorRules,
    pub validator: ValidatorOptions,
}

impl DetectorParams {
    pub fn prototype() -> Self {
        Self {
            strategy: Strategy::Clustering,
            preprocess: PreprocessOptions::prototype(),
            stickers: StickerOptions::default(),
            face: FaceOptions::default(),
            cluster: ClusterOptions::default(),
            perspective: PerspectiveOptions::default(),
            sampler: SamplerOptions::prototype(),
            rules: ColorRules::prototype(),
            validator: ValidatorOptions::prototype(),
        }
    }

    pub fn refined() -> Self {
        Self {
            strategy: Strategy::Homography,
            preprocess: PreprocessOptions::refined(),
            sampler: SamplerOptions::refined(),
            rules: ColorRules::default(),
            validator: ValidatorOptions::refined(),
            ..Self::prototype()
        }
    }

    pub fn for_strategy(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Clustering => Self::prototype(),
            Strategy::Homography => Self::refined(),
        }
    }
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self::refined()
    }
}
