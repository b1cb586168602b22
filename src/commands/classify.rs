use anyhow::{Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::{ClassifyArgs, ClassifyMode};
use crate::imaging::TesseractCli;
use crate::model::{ClassifyPaths, ClassifyRunManifest};
use crate::pipeline::{Pipeline, PipelineOptions};
use crate::util::{now_utc_string, utc_compact_string, write_json_pretty};

pub fn run(args: ClassifyArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let engine = TesseractCli::new(&args.tesseract_bin, &args.ocr_lang);
    let Some(tesseract_version) = engine.version() else {
        bail!(
            "tesseract is unavailable at {}; install it or pass --tesseract-bin",
            args.tesseract_bin.display()
        );
    };
    info!(run_id = %run_id, tesseract = %tesseract_version, "starting classify");

    let options = PipelineOptions {
        mode: args.mode,
        noise_threshold: args.noise_threshold,
        debug: args.debug,
    };
    let pipeline = Pipeline::new(&engine, options)?;

    let mut last_percent = None;
    let mut progress = |fraction: f64| -> Result<()> {
        let percent = (fraction * 100.0).round() as u32;
        if last_percent != Some(percent) {
            info!(progress = percent, "classify progress");
            last_percent = Some(percent);
        }
        Ok(())
    };

    let report = pipeline.run(&args.input_dir, &args.output_dir, &mut progress)?;

    if report.document_detection.is_none() && args.mode == ClassifyMode::Auto {
        warn!(input_dir = %args.input_dir.display(), "no readable page images found");
    }
    for warning in &report.warnings {
        warn!(warning = %warning, "classify warning");
    }

    info!(
        found = report.found().len(),
        pages = report.counts.page_count,
        output_dir = %args.output_dir.display(),
        "classify completed"
    );

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = ClassifyRunManifest {
            manifest_version: 1,
            run_id,
            status: "completed".to_string(),
            started_at,
            updated_at: now_utc_string(),
            command: render_classify_command(&args),
            tesseract_version: Some(tesseract_version),
            paths: ClassifyPaths {
                input_dir: args.input_dir.display().to_string(),
                output_dir: args.output_dir.display().to_string(),
            },
            report,
        };
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote classify run manifest");
    }

    Ok(())
}

fn render_classify_command(args: &ClassifyArgs) -> String {
    let mut command = vec![
        "clinsort".to_string(),
        "classify".to_string(),
        "--input-dir".to_string(),
        args.input_dir.display().to_string(),
        "--output-dir".to_string(),
        args.output_dir.display().to_string(),
    ];

    if args.mode != ClassifyMode::Auto {
        command.push("--mode".to_string());
        command.push(args.mode.as_str().to_string());
    }
    command.push("--ocr-lang".to_string());
    command.push(args.ocr_lang.clone());
    command.push("--tesseract-bin".to_string());
    command.push(args.tesseract_bin.display().to_string());
    command.push("--noise-threshold".to_string());
    command.push(args.noise_threshold.to_string());
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }
    if args.debug {
        command.push("--debug".to_string());
    }

    command.join(" ")
}
