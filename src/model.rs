use std::path::PathBuf;

use serde::Serialize;

use crate::classify::{CategoryMatch, Confidence};
use crate::imaging::{DocumentDetection, Region};
use crate::pages::PageFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageOutcome {
    Classified,
    Unclassified,
    Duplicate,
    Unreadable,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    pub page_number: u32,
    pub filename: String,
    pub sha256: Option<String>,
    pub outcome: PageOutcome,
    pub duplicate_of: Option<u32>,
    pub category: Option<String>,
    pub label: Option<String>,
    pub confidence: Option<Confidence>,
    pub region: Option<Region>,
    pub score: Option<usize>,
    pub artifact_path: Option<PathBuf>,
}

impl PageRecord {
    pub fn new(page: &PageFile, outcome: PageOutcome) -> Self {
        Self {
            page_number: page.number,
            filename: page.filename.clone(),
            sha256: None,
            outcome,
            duplicate_of: None,
            category: None,
            label: None,
            confidence: None,
            region: None,
            score: None,
            artifact_path: None,
        }
    }

    pub fn apply_match(&mut self, found: &CategoryMatch) {
        self.outcome = PageOutcome::Classified;
        self.category = Some(found.category.to_string());
        self.label = Some(found.label());
        self.confidence = Some(found.confidence);
        self.region = Some(found.region);
        self.score = Some(found.score);
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassifyCounts {
    pub page_count: usize,
    pub unreadable_count: usize,
    pub duplicate_count: usize,
    pub classified_count: usize,
    pub uncertain_count: usize,
    pub unclassified_count: usize,
    pub artifact_count: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub strategy: Option<String>,
    pub document_detection: Option<DocumentDetection>,
    pub counts: ClassifyCounts,
    pub pages: Vec<PageRecord>,
    pub warnings: Vec<String>,
}

impl RunReport {
    pub fn push(&mut self, record: PageRecord) {
        match record.outcome {
            PageOutcome::Classified => self.counts.classified_count += 1,
            PageOutcome::Unclassified => self.counts.unclassified_count += 1,
            PageOutcome::Duplicate => self.counts.duplicate_count += 1,
            PageOutcome::Unreadable => self.counts.unreadable_count += 1,
        }
        if record.confidence == Some(Confidence::Uncertain) {
            self.counts.uncertain_count += 1;
        }
        if record.artifact_path.is_some() {
            self.counts.artifact_count += 1;
        }
        self.pages.push(record);
    }

    pub fn found(&self) -> Vec<&PathBuf> {
        self.pages
            .iter()
            .filter_map(|record| record.artifact_path.as_ref())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyPaths {
    pub input_dir: String,
    pub output_dir: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub tesseract_version: Option<String>,
    pub paths: ClassifyPaths,
    #[serde(flatten)]
    pub report: RunReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageInventoryEntry {
    pub page_number: u32,
    pub filename: String,
    pub byte_len: u64,
    pub sha256: String,
    pub duplicate_of: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub page_count: usize,
    pub distinct_page_count: usize,
    pub pages: Vec<PageInventoryEntry>,
    pub skipped: Vec<String>,
}
