//! Per-cell color sampling and rule-based labeling.
//!
//! Each grid position is read as the per-channel median of a square HSV patch
//! around it, then mapped to a [`ColorLabel`](crate::types::ColorLabel) by a
//! tunable [`ColorRules`] table. The sampler optionally anchors the center
//! cell to the face's known center color.

pub mod hsv;
pub mod rules;
pub mod sampler;

pub use hsv::rgb_to_hsv;
pub use rules::ColorRules;
pub use sampler::{patch_median_hsv, sample_face, CellSample, PatchSize, SampledFace, SamplerOptions};
