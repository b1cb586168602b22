use crate::imaging::Region;
use crate::taxonomy::Taxonomy;

use super::{Classification, Confidence, PageText, matched};

#[derive(Debug)]
pub struct UnstructuredClassifier {
    taxonomy: Taxonomy,
}

impl UnstructuredClassifier {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn classify(&self, text: &mut dyn PageText) -> Classification {
        let full_page = text.region(Region::FullPage);
        match self.taxonomy.best_match(&full_page) {
            Some(scored) => matched(scored, Region::FullPage, Confidence::Confirmed),
            None => Classification::Unclassified,
        }
    }
}
