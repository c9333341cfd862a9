use crate::types::ColorLabel;
use serde::{Deserialize, Serialize};

/// Threshold table for labeling a median HSV triple.
///
/// Hues are on the 8-bit `[0, 180)` scale. Bands are half-open: a hue of
/// exactly `orange_max_hue` is yellow, not orange.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorRules {
    /// Anything darker than this is unreadable.
    pub min_value: f32,
    /// Below this saturation a patch is treated as achromatic.
    pub achromatic_max_saturation: f32,
    /// Achromatic patches brighter than this are white.
    pub white_min_value: f32,
    /// Achromatic patches darker than this are grey, i.e. unknown.
    pub gray_max_value: f32,
    /// Saturation needed before the hue bands are consulted. Negative
    /// disables the gate.
    pub chromatic_min_saturation: f32,
    pub red_low_max_hue: f32,
    pub red_high_min_hue: f32,
    pub orange_max_hue: f32,
    pub yellow_max_hue: f32,
    pub green_max_hue: f32,
    pub blue_max_hue: f32,
}

impl Default for ColorRules {
    fn default() -> Self {
        Self {
            min_value: 80.0,
            achromatic_max_saturation: 50.0,
            white_min_value: 150.0,
            gray_max_value: 120.0,
            chromatic_min_saturation: 40.0,
            red_low_max_hue: 15.0,
            red_high_min_hue: 170.0,
            orange_max_hue: 25.0,
            yellow_max_hue: 40.0,
            green_max_hue: 85.0,
            blue_max_hue: 135.0,
        }
    }
}

impl ColorRules {
    /// The sticker-clustering classifier: white needs `s < 40` and `v > 170`,
    /// integer hue bands are red 0–10 and 160–179, orange 11–30, yellow
    /// 31–40, green 41–80 and blue 81–130. There is no dark floor and no
    /// saturation gate, so a dim patch still gets a hue label.
    pub fn prototype() -> Self {
        Self {
            min_value: 0.0,
            achromatic_max_saturation: 40.0,
            white_min_value: 170.0,
            gray_max_value: 0.0,
            chromatic_min_saturation: -1.0,
            red_low_max_hue: 11.0,
            red_high_min_hue: 159.5,
            orange_max_hue: 31.0,
            yellow_max_hue: 41.0,
            green_max_hue: 81.0,
            blue_max_hue: 131.0,
        }
    }

    /// Label a median `(h, s, v)` triple. Pure; never fails.
    pub fn classify(&self, h: f32, s: f32, v: f32) -> ColorLabel {
        if !(h.is_finite() && s.is_finite() && v.is_finite()) || v < self.min_value {
            return ColorLabel::Unknown;
        }
        if s < self.achromatic_max_saturation {
            if v > self.white_min_value {
                return ColorLabel::White;
            }
            if v < self.gray_max_value {
                return ColorLabel::Unknown;
            }
        }
        if s > self.chromatic_min_saturation {
            return self.classify_hue(h);
        }
        ColorLabel::Unknown
    }

    fn classify_hue(&self, h: f32) -> ColorLabel {
        if h < self.red_low_max_hue || h > self.red_high_min_hue {
            ColorLabel::Red
        } else if h < self.orange_max_hue {
            ColorLabel::Orange
        } else if h < self.yellow_max_hue {
            ColorLabel::Yellow
        } else if h < self.green_max_hue {
            ColorLabel::Green
        } else if h < self.blue_max_hue {
            ColorLabel::Blue
        } else {
            ColorLabel::Unknown
        }
    }
}
