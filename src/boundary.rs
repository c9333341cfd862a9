//! Request/response payloads for the scanning web client, and the image codec
//! around them.
//!
//! Frames arrive as base64 (optionally a `data:image/...;base64,` URL); debug
//! images leave as PNG data URLs. No transport lives here.

use crate::detector::FaceDetector;
use crate::image::Frame;
use crate::types::{FaceColors, FaceIndex, FaceScan, ScanError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

pub const SERVICE_NAME: &str = "cube-vision-api";

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub image: String,
    /// Untrusted; out-of-range values scan as face 0.
    #[serde(default)]
    pub face_index: i64,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub success: bool,
    pub valid_detection: bool,
    pub colors: Option<FaceColors>,
    pub error: Option<ScanError>,
    pub face_index: FaceIndex,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warped: Option<String>,
}

impl ScanResponse {
    fn failed(face_index: FaceIndex, error: ScanError) -> Self {
        Self {
            success: false,
            valid_detection: false,
            colors: None,
            error: Some(error),
            face_index,
            edges: None,
            overlay: None,
            warped: None,
        }
    }
}

impl From<&FaceScan> for ScanResponse {
    fn from(scan: &FaceScan) -> Self {
        let encode = |img: DynamicImage| {
            encode_png_data_url(&img)
                .map_err(|e| warn!("ScanResponse: dropping debug image: {e}"))
                .ok()
        };
        let (edges, overlay, warped) = match &scan.debug {
            Some(art) => (
                encode(DynamicImage::ImageLuma8(art.edges.clone())),
                encode(DynamicImage::ImageRgb8(art.overlay.clone())),
                art.warped
                    .as_ref()
                    .and_then(|w| encode(DynamicImage::ImageRgb8(w.clone()))),
            ),
            None => (None, None, None),
        };
        Self {
            success: scan.success,
            valid_detection: scan.valid_detection,
            colors: scan.colors,
            error: scan.error,
            face_index: scan.face_index,
            edges,
            overlay,
            warped,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
}

pub fn health() -> Health {
    Health {
        status: "ok",
        service: SERVICE_NAME,
    }
}

/// User-facing hint for a failed scan.
pub fn guidance(error: ScanError) -> &'static str {
    match error {
        ScanError::ShapeNotFound => {
            "Can't find cube face. Move closer, center the face, and reduce rotation."
        }
        ScanError::ColorValidationFailed => {
            "Colors unclear. Improve lighting, avoid glare, and hold steady."
        }
        ScanError::PerspectiveFailed => {
            "Perspective correction failed. Align the face parallel to the camera."
        }
        ScanError::InsufficientStickers | ScanError::DecodeFailed => {
            "Detection failed. Adjust distance and lighting."
        }
    }
}

/// Decode a base64 image (raw or data URL) into an RGB frame.
pub fn decode_frame(payload: &str) -> Result<Frame, ScanError> {
    let trimmed = payload.trim();
    let body = match trimmed.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or(ScanError::DecodeFailed)?,
        None => trimmed,
    };
    if body.is_empty() {
        return Err(ScanError::DecodeFailed);
    }
    let bytes = STANDARD.decode(body).map_err(|e| {
        debug!("decode_frame: invalid base64: {e}");
        ScanError::DecodeFailed
    })?;
    let img = image::load_from_memory(&bytes).map_err(|e| {
        debug!("decode_frame: unreadable image: {e}");
        ScanError::DecodeFailed
    })?;
    Ok(img.to_rgb8())
}

pub fn encode_png_data_url(img: &DynamicImage) -> Result<String, String> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| format!("Failed to encode PNG: {e}"))?;
    Ok(format!(
        "data:image/png;base64,{}",
        STANDARD.encode(buf.into_inner())
    ))
}

/// Decode, scan and encode one request.
pub fn handle_request(detector: &FaceDetector, req: &ScanRequest) -> ScanResponse {
    let face = FaceIndex::from_raw_lenient(req.face_index);
    match decode_frame(&req.image) {
        Ok(frame) => ScanResponse::from(&detector.process(&frame, face, req.debug)),
        Err(err) => ScanResponse::failed(face, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::DetectorParams;
    use image::Rgb;

    fn png_data_url(frame: &Frame) -> String {
        encode_png_data_url(&DynamicImage::ImageRgb8(frame.clone())).unwrap()
    }

    #[test]
    fn decode_accepts_raw_base64_and_data_urls() {
        let frame = Frame::from_pixel(7, 5, Rgb([10, 200, 30]));
        let url = png_data_url(&frame);
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decode_frame(&url).unwrap(), frame);
        let raw = url.trim_start_matches("data:image/png;base64,");
        assert_eq!(decode_frame(raw).unwrap(), frame);
    }

    #[test]
    fn malformed_payloads_are_decode_failures() {
        for payload in ["", "data:image/png;base64", "@@not base64@@", "aGVsbG8gd29ybGQ="] {
            assert_eq!(decode_frame(payload), Err(ScanError::DecodeFailed), "{payload}");
        }
    }

    #[test]
    fn bad_request_serializes_error_code() {
        let detector = FaceDetector::new(DetectorParams::refined());
        let req: ScanRequest =
            serde_json::from_str(r#"{"image": "@@@", "faceIndex": 2}"#).unwrap();
        let resp = handle_request(&detector, &req);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "decode_failed");
        assert_eq!(json["faceIndex"], 2);
        assert!(json["colors"].is_null());
        assert!(json.get("overlay").is_none());
    }

    #[test]
    fn out_of_range_face_index_scans_as_front() {
        let detector = FaceDetector::new(DetectorParams::refined());
        let frame = Frame::from_pixel(32, 32, Rgb([0, 0, 0]));
        let req = ScanRequest {
            image: png_data_url(&frame),
            face_index: 9,
            debug: true,
        };
        let resp = handle_request(&detector, &req);
        assert_eq!(resp.face_index.get(), 0);
        assert_eq!(resp.error, Some(ScanError::ShapeNotFound));
        assert!(resp.overlay.is_some());
        assert!(resp.edges.is_some());
        assert!(resp.warped.is_none());
    }

    #[test]
    fn every_error_has_guidance() {
        assert!(guidance(ScanError::ShapeNotFound).contains("Move closer"));
        assert!(guidance(ScanError::DecodeFailed).starts_with("Detection failed"));
    }

    #[test]
    fn health_payload() {
        let json = serde_json::to_string(&health()).unwrap();
        assert_eq!(json, r#"{"status":"ok","service":"cube-vision-api"}"#);
    }
}
