use crate::detector::DetectorParams;
use crate::grid::Strategy;
use crate::types::FaceIndex;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct FaceInput {
    pub input: PathBuf,
    pub face_index: FaceIndex,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub json_out: Option<PathBuf>,
    /// Per-face `edges`, `overlay` and `warped` PNGs are written here.
    pub debug_dir: Option<PathBuf>,
}

/// Run configuration for `scan_face`.
///
/// `strategy` picks the preset. `params`, when given, is laid over that
/// preset key by key, so missing fields keep the preset's values. The
/// top-level `strategy` always wins over `params.strategy`.
#[derive(Clone, Debug, Deserialize)]
pub struct ScanToolConfig {
    #[serde(default)]
    pub strategy: Strategy,
    pub faces: Vec<FaceInput>,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub params: Option<Value>,
}

impl ScanToolConfig {
    pub fn detector_params(&self) -> Result<DetectorParams, String> {
        let preset = DetectorParams::for_strategy(self.strategy);
        let Some(overrides) = &self.params else {
            return Ok(preset);
        };
        let mut merged = serde_json::to_value(&preset)
            .map_err(|e| format!("Failed to serialize {:?} preset: {e}", self.strategy))?;
        merge_json(&mut merged, overrides);
        let mut params: DetectorParams = serde_json::from_value(merged)
            .map_err(|e| format!("Failed to parse params: {e}"))?;
        params.strategy = self.strategy;
        Ok(params)
    }
}

/// Recursively lay `patch` over `base`. Objects merge key by key; anything
/// else, and any object carrying a `kind` tag, replaces the base value.
fn merge_json(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) if !patch.contains_key("kind") => {
            for (key, value) in patch {
                match base.get_mut(key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}

pub fn load_config(path: &Path) -> Result<ScanToolConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: ScanToolConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    if config.faces.is_empty() {
        return Err(format!("Config {} lists no faces", path.display()));
    }
    config
        .detector_params()
        .map_err(|e| format!("Invalid config {}: {e}", path.display()))?;
    Ok(config)
}

/// Parse `<program> <config.json>` from the process arguments.
pub fn parse_cli(program: &str) -> Result<ScanToolConfig, String> {
    let mut args = std::env::args().skip(1);
    match (args.next(), args.next()) {
        (Some(path), None) => load_config(Path::new(&path)),
        _ => Err(format!("Usage: {program} <config.json>")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PatchSize;

    #[test]
    fn minimal_config_uses_strategy_preset() {
        let json = r#"{
            "strategy": "clustering",
            "faces": [{"input": "front.png", "face_index": 0}]
        }"#;
        let cfg: ScanToolConfig = serde_json::from_str(json).unwrap();
        let params = cfg.detector_params().unwrap();
        assert_eq!(params, DetectorParams::prototype());
        assert!(!cfg.debug);
        assert!(cfg.output.json_out.is_none());
    }

    #[test]
    fn params_override_keeps_top_level_strategy() {
        let json = r#"{
            "strategy": "clustering",
            "faces": [{"input": "a.png", "face_index": 5}],
            "params": {"validator": {"max_unknown": 1}}
        }"#;
        let cfg: ScanToolConfig = serde_json::from_str(json).unwrap();
        let params = cfg.detector_params().unwrap();
        assert_eq!(params.strategy, Strategy::Clustering);
        assert_eq!(params.validator.max_unknown, 1);
        assert_eq!(cfg.faces[0].face_index.name(), "bottom");
    }

    #[test]
    fn partial_params_keep_the_strategy_preset() {
        let json = r#"{
            "strategy": "clustering",
            "faces": [{"input": "a.png", "face_index": 0}],
            "params": {
                "strategy": "homography",
                "validator": {"max_unknown": 1},
                "preprocess": {"canny_high": 140.0}
            }
        }"#;
        let cfg: ScanToolConfig = serde_json::from_str(json).unwrap();
        let params = cfg.detector_params().unwrap();
        let preset = DetectorParams::prototype();
        assert_eq!(params.strategy, Strategy::Clustering);
        assert_eq!(params.validator.max_unknown, 1);
        assert_eq!(params.validator.require_center, preset.validator.require_center);
        assert_eq!(params.preprocess.canny_high, 140.0);
        assert_eq!(params.preprocess.canny_low, preset.preprocess.canny_low);
        assert_eq!(params.sampler, preset.sampler);
        assert_eq!(params.rules, preset.rules);
    }

    #[test]
    fn tagged_patch_size_is_replaced_whole() {
        let json = r#"{
            "strategy": "homography",
            "faces": [{"input": "a.png", "face_index": 0}],
            "params": {"sampler": {"patch": {"kind": "fixed", "half_width": 7}}}
        }"#;
        let cfg: ScanToolConfig = serde_json::from_str(json).unwrap();
        let params = cfg.detector_params().unwrap();
        assert_eq!(params.sampler.patch, PatchSize::Fixed { half_width: 7 });
        assert_eq!(
            params.sampler.anchor_center,
            DetectorParams::refined().sampler.anchor_center
        );
    }

    #[test]
    fn ill_typed_params_are_reported() {
        let json = r#"{
            "faces": [{"input": "a.png", "face_index": 0}],
            "params": {"validator": {"max_unknown": "many"}}
        }"#;
        let cfg: ScanToolConfig = serde_json::from_str(json).unwrap();
        let err = cfg.detector_params().unwrap_err();
        assert!(err.contains("params"), "{err}");
    }

    #[test]
    fn out_of_range_face_index_is_rejected() {
        let json = r#"{"faces": [{"input": "a.png", "face_index": 6}]}"#;
        assert!(serde_json::from_str::<ScanToolConfig>(json).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/scan.json")).unwrap_err();
        assert!(err.contains("/nonexistent/scan.json"));
    }
}
