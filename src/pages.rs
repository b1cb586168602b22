use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use image::DynamicImage;
use regex::Regex;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    pub number: u32,
    pub filename: String,
    pub path: PathBuf,
}

impl PageFile {
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).with_context(|| format!("failed to read {}", self.path.display()))
    }

    pub fn decode(&self) -> Result<DynamicImage> {
        decode_page(&self.read_bytes()?)
            .with_context(|| format!("failed to decode {}", self.path.display()))
    }
}

pub fn decode_page(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).context("unsupported or corrupt image data")
}

/// Lists page images in processing order: page number first, file name second.
/// Files whose stem carries no page number are skipped with a warning.
pub fn discover_pages(input_dir: &Path) -> Result<Vec<PageFile>> {
    if !input_dir.is_dir() {
        bail!("input directory does not exist: {}", input_dir.display());
    }

    let pattern = Regex::new(r"(\d+)$").context("failed to compile page number regex")?;

    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?;

    let mut pages = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", input_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let Some(filename) = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToOwned::to_owned)
        else {
            warn!(path = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };

        match page_number_from_name(&filename, &pattern) {
            Some(number) => pages.push(PageFile {
                number,
                filename,
                path,
            }),
            None => warn!(file = %filename, "skipping file without a page number"),
        }
    }

    pages.sort_by(|a, b| a.number.cmp(&b.number).then(a.filename.cmp(&b.filename)));
    Ok(pages)
}

fn page_number_from_name(filename: &str, pattern: &Regex) -> Option<u32> {
    let stem = Path::new(filename).file_stem()?.to_str()?;
    pattern
        .captures(stem)?
        .get(1)?
        .as_str()
        .parse::<u32>()
        .ok()
}
