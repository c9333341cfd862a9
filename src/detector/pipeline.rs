//! Face detector orchestrating preprocessing, grid resolution, sampling and
//! validation.
//!
//! ```no_run
//! use cube_face_detector::{FaceDetector, DetectorParams, FaceIndex};
//! use cube_face_detector::image::io::load_frame;
//!
//! # fn example() -> Result<(), String> {
//! let frame = load_frame(std::path::Path::new("face.png"))?;
//! let detector = FaceDetector::new(DetectorParams::refined());
//! let scan = detector.process(&frame, FaceIndex::ALL[0], false);
//! if scan.success {
//!     println!("{}", scan.colors.map(|c| c.letters()).unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

use super::params::DetectorParams;
use crate::color::sample_face;
use crate::diagnostics::{elapsed_ms, render_overlay, DebugArtifacts, ScanDiagnostics};
use crate::edges::edge_map;
use crate::grid::{ClusterGrid, GridResolver, Strategy, WarpedGrid};
use crate::image::Frame;
use crate::types::{FaceIndex, FaceScan, ScanError};
use crate::validate::Validator;
use log::{debug, warn};
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

/// One independent unit of work for [`FaceDetector::process_batch`].
#[derive(Clone, Debug)]
pub struct FaceJob {
    pub frame: Frame,
    pub face: FaceIndex,
    pub debug: bool,
}

/// Stateless per-frame detector. Shareable across threads.
pub struct FaceDetector {
    params: DetectorParams,
    resolver: Box<dyn GridResolver>,
    validator: Validator,
}

fn resolver_for(params: &DetectorParams) -> Box<dyn GridResolver> {
    match params.strategy {
        Strategy::Clustering => Box::new(ClusterGrid::new(params.stickers, params.cluster)),
        Strategy::Homography => Box::new(WarpedGrid::new(params.face, params.perspective)),
    }
}

impl FaceDetector {
    pub fn new(params: DetectorParams) -> Self {
        let resolver = resolver_for(&params);
        Self::with_resolver(params, resolver)
    }

    /// Use a custom grid resolver; the remaining stages keep `params`.
    pub fn with_resolver(params: DetectorParams, resolver: Box<dyn GridResolver>) -> Self {
        let validator = Validator::new(params.validator);
        Self {
            params,
            resolver,
            validator,
        }
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    pub fn strategy(&self) -> Strategy {
        self.resolver.strategy()
    }

    /// Scan one face. Never panics; every failure is reported on the result.
    pub fn process(&self, frame: &Frame, face: FaceIndex, debug: bool) -> FaceScan {
        match catch_unwind(AssertUnwindSafe(|| self.run(frame, face, debug))) {
            Ok(scan) => scan,
            Err(payload) => {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!("FaceDetector::process recovered from panic: {msg}");
                let (w, h) = frame.dimensions();
                let mut diagnostics = ScanDiagnostics::new(self.strategy(), w, h);
                diagnostics.internal_error = Some(msg);
                FaceScan {
                    success: false,
                    valid_detection: false,
                    colors: None,
                    error: Some(ScanError::PerspectiveFailed),
                    face_index: face,
                    diagnostics,
                    debug: None,
                }
            }
        }
    }

    /// Scan independent frames in parallel; output order follows `jobs`.
    pub fn process_batch(&self, jobs: &[FaceJob]) -> Vec<FaceScan> {
        jobs.par_iter()
            .map(|job| self.process(&job.frame, job.face, job.debug))
            .collect()
    }

    fn run(&self, frame: &Frame, face: FaceIndex, debug: bool) -> FaceScan {
        let total_start = Instant::now();
        let (w, h) = frame.dimensions();
        let mut diag = ScanDiagnostics::new(self.strategy(), w, h);

        let edges = diag
            .timings
            .time("edges", || edge_map(frame, &self.params.preprocess));
        let resolved = diag
            .timings
            .time("grid", || self.resolver.resolve(frame, &edges));

        let layout = match resolved {
            Ok(layout) => layout,
            Err(failure) => {
                diag.face_quad = failure.face_quad;
                diag.sticker_quads = failure.sticker_quads;
                diag.timings.total_ms = elapsed_ms(total_start);
                debug!(
                    "FaceDetector::process face={} strategy={:?} error={} total_ms={:.3}",
                    face,
                    diag.strategy,
                    failure.error,
                    diag.timings.total_ms
                );
                let artifacts = debug.then(|| DebugArtifacts {
                    overlay: render_overlay(frame, &diag),
                    edges,
                    warped: None,
                });
                return FaceScan {
                    success: false,
                    valid_detection: false,
                    colors: None,
                    error: Some(failure.error),
                    face_index: face,
                    diagnostics: diag,
                    debug: artifacts,
                };
            }
        };

        let expected = face.expected_center();
        let image = layout.sampling_image(frame);
        let sampled = diag.timings.time("sample", || {
            sample_face(
                image,
                &layout.positions,
                Some(expected),
                &self.params.sampler,
                &self.params.rules,
            )
        });
        let verdict = diag.timings.time("validate", || {
            self.validator.check(sampled.colors.as_slice(), Some(expected))
        });

        diag.grid = Some(layout.positions);
        diag.face_quad = layout.face_quad;
        diag.sticker_quads = layout.sticker_quads;
        diag.cells = sampled.cells;
        diag.unknown_count = Some(verdict.unknown_count);
        if let Some(r) = &layout.rectified {
            let (rw, rh) = r.image.dimensions();
            diag.rectified_size = Some([rw, rh]);
            diag.homography = Some(r.homography);
        }
        diag.timings.total_ms = elapsed_ms(total_start);

        debug!(
            "FaceDetector::process face={} strategy={:?} colors={} unknown={} accepted={} total_ms={:.3}",
            face,
            diag.strategy,
            sampled.colors.letters(),
            verdict.unknown_count,
            verdict.accepted,
            diag.timings.total_ms
        );

        let artifacts = debug.then(|| DebugArtifacts {
            overlay: render_overlay(frame, &diag),
            edges,
            warped: layout.rectified.map(|r| r.image),
        });

        FaceScan {
            success: verdict.accepted,
            valid_detection: verdict.accepted,
            colors: Some(sampled.colors),
            error: verdict.reason,
            face_index: face,
            diagnostics: diag,
            debug: artifacts,
        }
    }
}
