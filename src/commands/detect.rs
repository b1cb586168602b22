use anyhow::Result;
use tracing::{info, warn};

use crate::cli::DetectArgs;
use crate::imaging::detect_document_type;
use crate::pages::discover_pages;

pub fn run(args: DetectArgs) -> Result<()> {
    let pages = discover_pages(&args.input_dir)?;
    info!(input_dir = %args.input_dir.display(), pages = pages.len(), "detect requested");

    let Some(detection) = detect_document_type(&pages, args.noise_threshold) else {
        warn!(input_dir = %args.input_dir.display(), "no readable page to sample");
        return Ok(());
    };

    for sample in &detection.samples {
        info!(
            page = sample.page_number,
            noise_score = sample.noise_score,
            "noise sample"
        );
    }
    info!(
        document_type = detection.document_type.as_str(),
        noise_score = detection.noise_score,
        threshold = detection.threshold,
        "detect completed"
    );

    Ok(())
}
