use anyhow::{Context, Result};
use regex::Regex;

/// Minimum letter count for a header band to be trusted on its own.
pub const WEAK_HEADER_MIN_LETTERS: usize = 10;

const PREVIEW_CHARS: usize = 80;

#[derive(Debug)]
pub struct TextNormalizer {
    repairs: Vec<(Regex, &'static str)>,
}

impl TextNormalizer {
    pub fn new() -> Result<Self> {
        let table: [(&str, &'static str); 4] = [
            (r"\bb\. ?p\.", "bp"),
            (r"\bb p\b", "bp"),
            (r"\bs p o 2\b", "spo2"),
            (r"\bt e m p\b", "temp"),
        ];

        let repairs = table
            .into_iter()
            .map(|(pattern, replacement)| {
                Regex::new(pattern)
                    .with_context(|| format!("failed to compile OCR repair regex: {pattern}"))
                    .map(|regex| (regex, replacement))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { repairs })
    }

    pub fn normalize(&self, raw: &str) -> String {
        let mut text = raw
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<&str>>()
            .join(" ");

        for (pattern, replacement) in &self.repairs {
            if pattern.is_match(&text) {
                text = pattern.replace_all(&text, *replacement).into_owned();
            }
        }

        text
    }
}

pub fn alphabetic_count(text: &str) -> usize {
    text.chars()
        .filter(|character| character.is_ascii_alphabetic())
        .count()
}

pub fn is_weak_header(text: &str) -> bool {
    alphabetic_count(text) < WEAK_HEADER_MIN_LETTERS
}

pub fn preview(text: &str) -> String {
    let mut excerpt = text.chars().take(PREVIEW_CHARS).collect::<String>();
    if text.chars().count() > PREVIEW_CHARS {
        excerpt.push_str("...");
    }
    excerpt
}
