mod dedup;
mod naming;


use std::fs;
use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::ClassifyMode;
use crate::classify::{Classification, ClassificationStrategy};
use crate::imaging::{
    DEFAULT_NOISE_THRESHOLD, DocumentDetection, OcrEngine, PageRegions, RegionReader,
    detect_document_type,
};
use crate::model::{PageOutcome, PageRecord, RunReport};
use crate::pages::{PageFile, decode_page, discover_pages};
use crate::text::{TextNormalizer, preview};
use crate::util::{ensure_disjoint_directories, reset_directory, sha256_bytes};

pub use dedup::PageDeduplicator;
use naming::artifact_path;

pub trait ProgressSink {
    fn report(&mut self, fraction: f64) -> Result<()>;
}

impl<F> ProgressSink for F
where
    F: FnMut(f64) -> Result<()>,
{
    fn report(&mut self, fraction: f64) -> Result<()> {
        self(fraction)
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub mode: ClassifyMode,
    pub noise_threshold: f64,
    pub debug: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            mode: ClassifyMode::Auto,
            noise_threshold: DEFAULT_NOISE_THRESHOLD,
            debug: false,
        }
    }
}

pub struct Pipeline<'a, E: ?Sized> {
    engine: &'a E,
    normalizer: TextNormalizer,
    options: PipelineOptions,
}

impl<'a, E: OcrEngine + ?Sized> Pipeline<'a, E> {
    pub fn new(engine: &'a E, options: PipelineOptions) -> Result<Self> {
        Ok(Self {
            engine,
            normalizer: TextNormalizer::new()?,
            options,
        })
    }

    pub fn run(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        progress: &mut dyn ProgressSink,
    ) -> Result<RunReport> {
        let pages = discover_pages(input_dir)?;
        ensure_disjoint_directories(input_dir, output_dir)?;
        reset_directory(output_dir)?;

        info!(
            input_dir = %input_dir.display(),
            output_dir = %output_dir.display(),
            pages = pages.len(),
            "starting classification run"
        );

        let mut report = RunReport::default();
        report.counts.page_count = pages.len();

        let Some((strategy, detection)) = self.select_strategy(&pages)? else {
            warn!("no readable page to detect the document type from, nothing classified");
            return Ok(report);
        };
        report.strategy = Some(strategy.name().to_string());
        report.document_detection = detection;
        info!(strategy = strategy.name(), "selected classification strategy");

        let mut dedup = PageDeduplicator::default();
        let total = pages.len();
        for (index, page) in pages.iter().enumerate() {
            let record = self.process_page(
                page,
                &strategy,
                &mut dedup,
                output_dir,
                &mut report.warnings,
            );
            report.push(record);

            let fraction = (index + 1) as f64 / total as f64;
            if let Err(error) = progress.report(fraction) {
                warn!(error = %error, fraction, "progress callback failed");
            }
        }

        info!(
            classified = report.counts.classified_count,
            uncertain = report.counts.uncertain_count,
            unclassified = report.counts.unclassified_count,
            duplicates = report.counts.duplicate_count,
            unreadable = report.counts.unreadable_count,
            distinct_pages = dedup.distinct(),
            "classification run completed"
        );

        Ok(report)
    }

    fn select_strategy(
        &self,
        pages: &[PageFile],
    ) -> Result<Option<(ClassificationStrategy, Option<DocumentDetection>)>> {
        match self.options.mode {
            ClassifyMode::Structured => Ok(Some((ClassificationStrategy::structured()?, None))),
            ClassifyMode::Unstructured => {
                Ok(Some((ClassificationStrategy::unstructured()?, None)))
            }
            ClassifyMode::Auto => {
                let Some(detection) = detect_document_type(pages, self.options.noise_threshold)
                else {
                    return Ok(None);
                };
                let strategy = ClassificationStrategy::for_document(detection.document_type)?;
                Ok(Some((strategy, Some(detection))))
            }
        }
    }

    fn process_page(
        &self,
        page: &PageFile,
        strategy: &ClassificationStrategy,
        dedup: &mut PageDeduplicator,
        output_dir: &Path,
        warnings: &mut Vec<String>,
    ) -> PageRecord {
        let mut record = PageRecord::new(page, PageOutcome::Unreadable);

        let bytes = match page.read_bytes() {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(file = %page.filename, error = %error, "page unreadable, skipped");
                return record;
            }
        };

        let sha256 = sha256_bytes(&bytes);
        record.sha256 = Some(sha256.clone());

        if let Some(first_page) = dedup.first_seen(&sha256, page.number) {
            info!(
                page = page.number,
                file = %page.filename,
                sha256 = %sha256,
                duplicate_of = first_page,
                "duplicate page skipped"
            );
            record.outcome = PageOutcome::Duplicate;
            record.duplicate_of = Some(first_page);
            return record;
        }

        let image = match decode_page(&bytes) {
            Ok(image) => image,
            Err(error) => {
                warn!(
                    file = %page.filename,
                    sha256 = %sha256,
                    error = %error,
                    "page unreadable, skipped"
                );
                return record;
            }
        };

        let mut regions = PageRegions::new(
            RegionReader::new(self.engine, &self.normalizer),
            image.to_luma8(),
        );
        let classification = strategy.classify(&mut regions);

        if self.options.debug {
            info!(file = %page.filename, sha256 = %sha256, "page diagnostics");
            for (region, text) in regions.extracted() {
                info!(
                    file = %page.filename,
                    region = region.as_str(),
                    text = %preview(text),
                    "extracted text"
                );
            }
        }

        let Classification::Matched(found) = classification else {
            record.outcome = PageOutcome::Unclassified;
            if self.options.debug {
                info!(file = %page.filename, decision = "unclassified", "page decision");
            }
            return record;
        };

        record.apply_match(&found);
        let label = found.label();
        if self.options.debug {
            info!(
                file = %page.filename,
                decision = %label,
                region = found.region.as_str(),
                confidence = found.confidence.as_str(),
                score = found.score,
                "page decision"
            );
        }

        let destination = artifact_path(output_dir, strategy.naming_policy(), page.number, &label);
        match fs::write(&destination, &bytes) {
            Ok(()) => {
                info!(
                    page = page.number,
                    category = %label,
                    path = %destination.display(),
                    "page classified"
                );
                record.artifact_path = Some(destination);
            }
            Err(error) => {
                let message = format!(
                    "failed to write {} for page {}: {}",
                    destination.display(),
                    page.number,
                    error
                );
                warn!(page = page.number, error = %error, "failed to copy classified page");
                warnings.push(message);
            }
        }

        record
    }
}
