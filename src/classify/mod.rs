mod structured;
mod unstructured;

#[cfg(test)]
mod tests;

use anyhow::Result;
use serde::Serialize;

use crate::imaging::{DocumentType, Region};
use crate::taxonomy::{ScoredCategory, Taxonomy};

pub use structured::StructuredClassifier;
pub use unstructured::UnstructuredClassifier;

/// Body hits required before a header/footer category counts as confirmed.
pub const CONFIRMATION_MIN_HITS: usize = 2;

const UNCERTAIN_SUFFIX: &str = "_uncertain";

pub trait PageText {
    fn region(&mut self, region: Region) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Confirmed,
    Uncertain,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::Confirmed => "confirmed",
            Confidence::Uncertain => "uncertain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMatch {
    pub category: &'static str,
    pub confidence: Confidence,
    pub region: Region,
    pub score: usize,
}

impl CategoryMatch {
    pub fn label(&self) -> String {
        match self.confidence {
            Confidence::Confirmed => self.category.to_string(),
            Confidence::Uncertain => format!("{}{}", self.category, UNCERTAIN_SUFFIX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Unclassified,
    Matched(CategoryMatch),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingPolicy {
    PageQualified,
    CategorySuffixed,
}

#[derive(Debug)]
pub enum ClassificationStrategy {
    Structured(StructuredClassifier),
    Unstructured(UnstructuredClassifier),
}

impl ClassificationStrategy {
    pub fn structured() -> Result<Self> {
        Ok(Self::Structured(StructuredClassifier::new(
            Taxonomy::structured()?,
        )))
    }

    pub fn unstructured() -> Result<Self> {
        Ok(Self::Unstructured(UnstructuredClassifier::new(
            Taxonomy::unstructured()?,
        )))
    }

    pub fn for_document(document_type: DocumentType) -> Result<Self> {
        match document_type {
            DocumentType::Digital => Self::structured(),
            DocumentType::Scanned => Self::unstructured(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Structured(_) => "structured",
            Self::Unstructured(_) => "unstructured",
        }
    }

    pub fn naming_policy(&self) -> NamingPolicy {
        match self {
            Self::Structured(_) => NamingPolicy::PageQualified,
            Self::Unstructured(_) => NamingPolicy::CategorySuffixed,
        }
    }

    pub fn classify(&self, text: &mut dyn PageText) -> Classification {
        match self {
            Self::Structured(classifier) => classifier.classify(text),
            Self::Unstructured(classifier) => classifier.classify(text),
        }
    }
}

fn matched(scored: ScoredCategory<'_>, region: Region, confidence: Confidence) -> Classification {
    Classification::Matched(CategoryMatch {
        category: scored.category.id,
        confidence,
        region,
        score: scored.score,
    })
}
