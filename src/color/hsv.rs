//! 8-bit HSV in the camera-pipeline convention: hue is degrees halved so it
//! fits a byte (`[0, 180)`), saturation and value span `[0, 255]`.

/// Convert one RGB pixel to `[h, s, v]`.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(f32::from);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v > 0.0 { 255.0 * diff / v } else { 0.0 };

    let hue_deg = if diff <= 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    let hue_deg = if hue_deg < 0.0 { hue_deg + 360.0 } else { hue_deg };

    let mut h = (hue_deg / 2.0).round();
    if h >= 180.0 {
        h -= 180.0;
    }
    [h as u8, s.round() as u8, v as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_and_greys() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
        assert_eq!(rgb_to_hsv([255, 255, 0]), [30, 255, 255]);
        assert_eq!(rgb_to_hsv([235, 235, 235]), [0, 0, 235]);
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
    }

    #[test]
    fn hue_wraps_below_180() {
        // 359.x degrees rounds up to 180 before wrapping.
        let [h, s, v] = rgb_to_hsv([255, 0, 1]);
        assert_eq!(h, 0);
        assert_eq!(s, 255);
        assert_eq!(v, 255);
        let [h, _, _] = rgb_to_hsv([255, 0, 40]);
        assert!(h > 170, "h={h}");
    }

    #[test]
    fn orange_lands_between_red_and_yellow() {
        let [h, _, _] = rgb_to_hsv([255, 140, 0]);
        assert_eq!(h, 16);
    }
}
