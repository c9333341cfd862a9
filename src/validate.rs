//! Accept/reject policy for a nine-label reading.

use crate::types::{ColorLabel, ScanError, CENTER_CELL, GRID_CELLS};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Largest tolerated number of `unknown` labels.
    pub max_unknown: usize,
    /// Reject when the center label differs from the expected center color.
    pub require_center: bool,
}

impl ValidatorOptions {
    pub fn prototype() -> Self {
        Self {
            max_unknown: 6,
            require_center: false,
        }
    }

    pub fn refined() -> Self {
        Self {
            max_unknown: 2,
            require_center: true,
        }
    }
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self::refined()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub accepted: bool,
    pub unknown_count: usize,
    /// `None` when no expected center was supplied.
    pub center_matches: Option<bool>,
    pub reason: Option<ScanError>,
}

#[derive(Clone, Debug, Default)]
pub struct Validator {
    opts: ValidatorOptions,
}

impl Validator {
    pub fn new(opts: ValidatorOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.opts
    }

    pub fn check(&self, labels: &[ColorLabel], expected: Option<ColorLabel>) -> Verdict {
        let unknown_count = labels.iter().filter(|c| c.is_unknown()).count();
        let complete = labels.len() == GRID_CELLS;
        let center_matches = match (expected, labels.get(CENTER_CELL)) {
            (Some(want), Some(got)) => Some(*got == want),
            (Some(_), None) => Some(false),
            (None, _) => None,
        };
        let center_ok = !self.opts.require_center || center_matches.unwrap_or(true);
        let accepted = complete && center_ok && unknown_count <= self.opts.max_unknown;
        Verdict {
            accepted,
            unknown_count,
            center_matches,
            reason: (!accepted).then_some(ScanError::ColorValidationFailed),
        }
    }
}
