use std::path::{Path, PathBuf};

use crate::classify::NamingPolicy;

const ARTIFACT_EXTENSION: &str = "png";

pub fn clean_filename(label: &str) -> String {
    label
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|character| {
            character.is_ascii_lowercase() || character.is_ascii_digit() || *character == '_'
        })
        .collect()
}

pub fn artifact_path(
    output_dir: &Path,
    policy: NamingPolicy,
    page_number: u32,
    label: &str,
) -> PathBuf {
    let label = clean_filename(label);
    let base = match policy {
        NamingPolicy::PageQualified => format!("{page_number}_{label}"),
        NamingPolicy::CategorySuffixed => label,
    };

    let mut candidate = output_dir.join(format!("{base}.{ARTIFACT_EXTENSION}"));
    let mut counter = 1u32;
    while candidate.exists() {
        candidate = output_dir.join(format!("{base}_{counter}.{ARTIFACT_EXTENSION}"));
        counter += 1;
    }
    candidate
}
