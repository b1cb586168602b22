use image::GrayImage;
use imageproc::filter::gaussian_blur_f32;
use serde::Serialize;
use tracing::{debug, info};

use crate::pages::PageFile;

pub const DEFAULT_NOISE_THRESHOLD: f64 = 9.0;

const SAMPLE_PAGES: usize = 3;

// Roughly a 21x21 kernel: wide enough to wipe out glyphs but keep paper texture.
const BACKGROUND_BLUR_SIGMA: f32 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Scanned,
    Digital,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Scanned => "scanned",
            DocumentType::Digital => "digital",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NoiseSample {
    pub page_number: u32,
    pub noise_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentDetection {
    pub document_type: DocumentType,
    pub noise_score: f64,
    pub threshold: f64,
    pub decided_by_page: u32,
    pub samples: Vec<NoiseSample>,
}

/// Standard deviation of `|gray - blur(gray)|`.
pub fn noise_score(gray: &GrayImage) -> f64 {
    let pixel_count = u64::from(gray.width()) * u64::from(gray.height());
    if pixel_count == 0 {
        return 0.0;
    }

    let blurred = gaussian_blur_f32(gray, BACKGROUND_BLUR_SIGMA);
    let (sum, sum_sq) = gray
        .pixels()
        .zip(blurred.pixels())
        .fold((0.0_f64, 0.0_f64), |(sum, sum_sq), (original, smooth)| {
            let diff = (f64::from(original.0[0]) - f64::from(smooth.0[0])).abs();
            (sum + diff, sum_sq + diff * diff)
        });

    let count = pixel_count as f64;
    let mean = sum / count;
    (sum_sq / count - mean * mean).max(0.0).sqrt()
}

pub fn document_type_for(noise_score: f64, threshold: f64) -> DocumentType {
    if noise_score > threshold {
        DocumentType::Scanned
    } else {
        DocumentType::Digital
    }
}

pub fn detect_document_type(pages: &[PageFile], threshold: f64) -> Option<DocumentDetection> {
    let mut samples = Vec::with_capacity(SAMPLE_PAGES);

    for page in pages {
        if samples.len() == SAMPLE_PAGES {
            break;
        }

        let image = match page.decode() {
            Ok(image) => image,
            Err(error) => {
                debug!(file = %page.filename, error = %error, "page unreadable, not sampled");
                continue;
            }
        };

        let score = noise_score(&image.to_luma8());
        debug!(page = page.number, noise_score = score, "sampled page noise");
        samples.push(NoiseSample {
            page_number: page.number,
            noise_score: score,
        });
    }

    let first = samples.first()?;
    let document_type = document_type_for(first.noise_score, threshold);
    info!(
        document_type = document_type.as_str(),
        noise_score = first.noise_score,
        threshold,
        page = first.page_number,
        "detected document type"
    );

    Some(DocumentDetection {
        document_type,
        noise_score: first.noise_score,
        threshold,
        decided_by_page: first.page_number,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use image::Luma;

    use super::*;

    fn speckled_page() -> GrayImage {
        GrayImage::from_fn(80, 80, |x, y| {
            if x < 40 && (x + y) % 2 == 0 {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }

    fn write_page(dir: &Path, number: u32, image: &GrayImage) -> PageFile {
        let filename = format!("page_{number}.png");
        let path = dir.join(&filename);
        image.save(&path).unwrap();
        PageFile {
            number,
            filename,
            path,
        }
    }

    #[test]
    fn flat_page_has_no_noise() {
        let page = GrayImage::from_pixel(64, 64, Luma([240]));
        assert!(noise_score(&page) < 1.0);
        assert_eq!(noise_score(&GrayImage::new(0, 0)), 0.0);
    }

    #[test]
    fn speckled_page_scores_above_threshold() {
        assert!(noise_score(&speckled_page()) > DEFAULT_NOISE_THRESHOLD);
    }

    #[test]
    fn threshold_is_exclusive() {
        assert_eq!(document_type_for(9.0, 9.0), DocumentType::Digital);
        assert_eq!(document_type_for(9.01, 9.0), DocumentType::Scanned);
    }

    #[test]
    fn detection_uses_first_readable_page() {
        let dir = tempfile::tempdir().unwrap();
        let broken_path = dir.path().join("page_1.png");
        fs::write(&broken_path, b"not an image").unwrap();
        let broken = PageFile {
            number: 1,
            filename: "page_1.png".to_string(),
            path: broken_path,
        };
        let noisy = write_page(dir.path(), 2, &speckled_page());
        let clean = write_page(dir.path(), 3, &GrayImage::from_pixel(80, 80, Luma([255])));

        let detection =
            detect_document_type(&[broken, noisy, clean], DEFAULT_NOISE_THRESHOLD).unwrap();
        assert_eq!(detection.document_type, DocumentType::Scanned);
        assert_eq!(detection.decided_by_page, 2);
        assert_eq!(detection.samples.len(), 2);
    }

    #[test]
    fn detection_samples_at_most_three_pages() {
        let dir = tempfile::tempdir().unwrap();
        let clean = GrayImage::from_pixel(16, 16, Luma([255]));
        let pages = (1..=5)
            .map(|number| write_page(dir.path(), number, &clean))
            .collect::<Vec<_>>();

        let detection = detect_document_type(&pages, DEFAULT_NOISE_THRESHOLD).unwrap();
        assert_eq!(detection.document_type, DocumentType::Digital);
        assert_eq!(detection.samples.len(), 3);
    }

    #[test]
    fn detection_without_readable_pages_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page_1.png");
        fs::write(&path, b"garbage").unwrap();
        let page = PageFile {
            number: 1,
            filename: "page_1.png".to_string(),
            path,
        };

        assert!(detect_document_type(&[page], DEFAULT_NOISE_THRESHOLD).is_none());
        assert!(detect_document_type(&[], DEFAULT_NOISE_THRESHOLD).is_none());
    }
}
