use cube_face_detector::boundary::guidance;
use cube_face_detector::config::scan::{self, ScanToolConfig};
use cube_face_detector::cube_state::CubeState;
use cube_face_detector::image::io::{load_frame, save_gray, save_rgb, write_json_file};
use cube_face_detector::{FaceDetector, FaceJob, FaceScan};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "scan_face".to_string());
    let config = scan::parse_cli(&program)?;

    let jobs = load_jobs(&config)?;
    let detector = FaceDetector::new(config.detector_params()?);
    let scans = detector.process_batch(&jobs);

    print_text_summary(&config, &scans);

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &scans)?;
        println!("\nJSON report written to {}", path.display());
    }

    if let Some(dir) = &config.output.debug_dir {
        save_debug_artifacts(dir, &scans)?;
        println!("Debug artifacts written to {}", dir.display());
    }

    match CubeState::from_scans(&scans) {
        Ok(cube) => {
            println!("\nCube state: {}", cube.to_state_string());
            match cube.to_solver_facelets() {
                Ok(facelets) => println!("Solver facelets: {facelets}"),
                Err(e) => println!("Solver facelets unavailable: {e}"),
            }
        }
        Err(e) if scans.len() == 6 => println!("\nCube state incomplete: {e}"),
        Err(_) => {}
    }

    Ok(())
}

fn load_jobs(config: &ScanToolConfig) -> Result<Vec<FaceJob>, String> {
    config
        .faces
        .iter()
        .map(|face| {
            Ok(FaceJob {
                frame: load_frame(&face.input)?,
                face: face.face_index,
                debug: config.debug || config.output.debug_dir.is_some(),
            })
        })
        .collect()
}

fn print_text_summary(config: &ScanToolConfig, scans: &[FaceScan]) {
    println!("Scan summary (strategy: {:?})", config.strategy);
    for (input, scan) in config.faces.iter().zip(scans) {
        let diag = &scan.diagnostics;
        println!("\n{} <- {}", scan.face_index, input.input.display());
        println!("  success: {}", scan.success);
        match &scan.colors {
            Some(colors) => println!(
                "  colors: {} (unknown={})",
                colors.letters(),
                colors.unknown_count()
            ),
            None => println!("  colors: -"),
        }
        if let Some(err) = scan.error {
            println!("  error: {}", err.code());
            println!("  hint: {}", guidance(err));
        }
        if let Some(quad) = &diag.face_quad {
            println!(
                "  face quad: area={:.0} aspect={:.3}",
                quad.area,
                quad.aspect_ratio()
            );
        }
        if !diag.sticker_quads.is_empty() {
            println!("  sticker candidates: {}", diag.sticker_quads.len());
        }
        if let Some([w, h]) = diag.rectified_size {
            println!("  rectified: {w}x{h}");
        }
        let stages: Vec<String> = diag
            .timings
            .stages
            .iter()
            .map(|s| format!("{}={:.3}", s.label, s.elapsed_ms))
            .collect();
        println!(
            "  timings (ms): {} total={:.3}",
            stages.join(" "),
            diag.timings.total_ms
        );
    }
}

fn save_debug_artifacts(dir: &Path, scans: &[FaceScan]) -> Result<(), String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create debug dir {}: {e}", dir.display()))?;
    for scan in scans {
        let stem = scan.face_index.name();
        write_json_file(&dir.join(format!("{stem}_scan.json")), scan)?;
        if let Some(art) = &scan.debug {
            save_gray(&art.edges, &dir.join(format!("{stem}_edges.png")))?;
            save_rgb(&art.overlay, &dir.join(format!("{stem}_overlay.png")))?;
            if let Some(warped) = &art.warped {
                save_rgb(warped, &dir.join(format!("{stem}_warped.png")))?;
            }
        }
    }
    Ok(())
}
