use crate::imaging::Region;
use crate::taxonomy::{ScoredCategory, Taxonomy};
use crate::text::is_weak_header;

use super::{CONFIRMATION_MIN_HITS, Classification, Confidence, PageText, matched};

#[derive(Debug)]
pub struct StructuredClassifier {
    taxonomy: Taxonomy,
}

impl StructuredClassifier {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn classify(&self, text: &mut dyn PageText) -> Classification {
        let header = text.region(Region::Header);
        let mut selected = self
            .taxonomy
            .best_match(&header)
            .map(|scored| (scored, Region::Header));

        if selected.is_none() || is_weak_header(&header) {
            let footer = text.region(Region::Footer);
            if let Some(scored) = self.taxonomy.best_match(&footer) {
                selected = Some((scored, Region::Footer));
            }
        }

        if let Some((scored, region)) = selected {
            let body = text.region(Region::Body);
            return confirm(scored, region, &body);
        }

        let full_page = text.region(Region::FullPage);
        match self.taxonomy.best_match(&full_page) {
            Some(scored) => confirm(scored, Region::FullPage, &full_page),
            None => Classification::Unclassified,
        }
    }
}

fn confirm(scored: ScoredCategory<'_>, region: Region, evidence: &str) -> Classification {
    let confidence = match scored.category.confirmation_hits(evidence) {
        Some(hits) if hits < CONFIRMATION_MIN_HITS => Confidence::Uncertain,
        _ => Confidence::Confirmed,
    };
    matched(scored, region, confidence)
}
