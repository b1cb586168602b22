use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, bail};
use image::{GrayImage, ImageFormat};
use imageproc::filter::median_filter;
use tracing::debug;

use crate::classify::PageText;
use crate::imaging::regions::{Region, crop_region};
use crate::text::TextNormalizer;

const DENOISE_RADIUS: u32 = 1;

pub trait OcrEngine {
    fn recognize(&self, image: &GrayImage) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct TesseractCli {
    binary: PathBuf,
    lang: String,
}

impl TesseractCli {
    pub fn new(binary: impl Into<PathBuf>, lang: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            lang: lang.into(),
        }
    }

    pub fn version(&self) -> Option<String> {
        let output = Command::new(&self.binary).arg("--version").output().ok()?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let source = if stdout.trim().is_empty() {
            stderr.trim()
        } else {
            stdout.trim()
        };

        source
            .lines()
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.to_string())
    }
}

impl OcrEngine for TesseractCli {
    fn recognize(&self, image: &GrayImage) -> Result<String> {
        let scratch = tempfile::Builder::new()
            .prefix("clinsort_ocr_")
            .suffix(".png")
            .tempfile()
            .context("failed to create OCR scratch file")?;

        image
            .save_with_format(scratch.path(), ImageFormat::Png)
            .with_context(|| format!("failed to write OCR input {}", scratch.path().display()))?;

        let output = Command::new(&self.binary)
            .arg(scratch.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .arg("--oem")
            .arg("3")
            .arg("--psm")
            .arg("6")
            .output()
            .with_context(|| format!("failed to execute {}", self.binary.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "tesseract returned non-zero exit status for {}: {}",
                scratch.path().display(),
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).replace('\u{0000}', ""))
    }
}

pub struct RegionReader<'a, E: ?Sized> {
    engine: &'a E,
    normalizer: &'a TextNormalizer,
}

impl<'a, E: OcrEngine + ?Sized> RegionReader<'a, E> {
    pub fn new(engine: &'a E, normalizer: &'a TextNormalizer) -> Self {
        Self { engine, normalizer }
    }

    pub fn read(&self, page: &GrayImage, region: Region) -> String {
        let Some(band) = crop_region(page, region) else {
            return String::new();
        };

        let denoised = median_filter(&band, DENOISE_RADIUS, DENOISE_RADIUS);
        match self.engine.recognize(&denoised) {
            Ok(raw) => self.normalizer.normalize(&raw),
            Err(error) => {
                debug!(region = region.as_str(), error = %error, "OCR failed, region treated as empty");
                String::new()
            }
        }
    }
}

pub struct PageRegions<'a, E: ?Sized> {
    reader: RegionReader<'a, E>,
    page: GrayImage,
    extracted: [Option<String>; 4],
}

impl<'a, E: OcrEngine + ?Sized> PageRegions<'a, E> {
    pub fn new(reader: RegionReader<'a, E>, page: GrayImage) -> Self {
        Self {
            reader,
            page,
            extracted: Default::default(),
        }
    }

    pub fn extracted(&self) -> impl Iterator<Item = (Region, &str)> + '_ {
        Region::ALL.into_iter().filter_map(|region| {
            self.extracted[region.index()]
                .as_deref()
                .map(|text| (region, text))
        })
    }
}

impl<E: OcrEngine + ?Sized> PageText for PageRegions<'_, E> {
    fn region(&mut self, region: Region) -> String {
        if let Some(text) = &self.extracted[region.index()] {
            return text.clone();
        }

        let text = self.reader.read(&self.page, region);
        self.extracted[region.index()] = Some(text.clone());
        text
    }
}
