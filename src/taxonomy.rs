use anyhow::{Context, Result};
use regex::Regex;

struct CategorySpec {
    id: &'static str,
    keywords: &'static [&'static str],
    confirmation: Option<&'static [&'static str]>,
    min_score: usize,
    booster: Option<BoosterSpec>,
}

struct BoosterSpec {
    pattern: &'static str,
    boost: usize,
}

// Blood pressure, SpO2, pulse, temperature readings and dosage mentions.
const VITAL_READING_PATTERN: &str = concat!(
    r"(?i)(bp\s*\d{2,3}\s*/\s*\d{2,3})",
    r"|(spo2\s*:?\s*\d{2,3})",
    r"|(pulse\s*:?\s*\d{2,3})",
    r"|(temp\s*:?\s*\d{2,3})",
    r"|(\b\d+(\.\d+)?\s*(mg|mcg|ml|iu)\b)",
);

const VITAL_READING_BOOST: usize = 2;

// Registration order is the tie-break order.
const STRUCTURED_CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        id: "patient_record",
        keywords: &["case sheet", "case record", "patient record", "admission record"],
        confirmation: None,
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "vitals_chart",
        keywords: &["vitals chart", "vital signs", "tpr chart", "observation chart"],
        confirmation: Some(&["bp", "pulse", "spo2", "temp", "resp"]),
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "assessment",
        keywords: &["assessment", "initial assessment", "nursing assessment"],
        confirmation: Some(&["history", "examination", "diagnosis", "complaint"]),
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "drug_chart",
        keywords: &["drug chart", "medication chart", "medication administration"],
        confirmation: Some(&["dose", "route", "frequency", "tab", "inj"]),
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "progress_notes",
        keywords: &["progress notes", "progress note", "clinical notes"],
        confirmation: None,
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "lab_report",
        keywords: &[
            "lab report",
            "laboratory report",
            "investigation report",
            "haematology",
            "hematology",
            "biochemistry",
        ],
        confirmation: Some(&[
            "hb",
            "wbc",
            "platelet",
            "creatinine",
            "urea",
            "sodium",
            "potassium",
        ]),
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "intake_output",
        keywords: &["intake output", "intake/output", "fluid balance"],
        confirmation: Some(&["oral", "iv fluid", "urine", "total"]),
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "icu_chart",
        keywords: &["icu chart", "icu flow sheet", "critical care chart"],
        confirmation: Some(&["ventilator", "gcs", "fio2", "spo2"]),
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "radiology_report",
        keywords: &["radiology report", "x-ray", "ct scan", "mri", "ultrasound"],
        confirmation: Some(&["impression", "findings"]),
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "consent_form",
        keywords: &["consent form", "informed consent"],
        confirmation: None,
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "discharge_summary",
        keywords: &["discharge summary", "discharge note"],
        confirmation: Some(&["diagnosis", "advice", "follow up", "condition at discharge"]),
        min_score: 1,
        booster: None,
    },
];

const UNSTRUCTURED_CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        id: "drug",
        keywords: &["drug chart", "medication", "prescription", "dose", "dosage"],
        confirmation: None,
        min_score: 2,
        booster: None,
    },
    CategorySpec {
        id: "xray",
        keywords: &["x-ray", "xray", "radiograph"],
        confirmation: None,
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "ct_scan",
        keywords: &["ct scan", "computed tomography"],
        confirmation: None,
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "mri",
        keywords: &["mri", "magnetic resonance"],
        confirmation: None,
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "ultrasound",
        keywords: &["ultrasound", "usg"],
        confirmation: None,
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "ecg",
        keywords: &["ecg", "electrocardiogram"],
        confirmation: None,
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "echo",
        keywords: &["echo", "echocardiography"],
        confirmation: None,
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "treatment_plan",
        keywords: &["treatment plan", "management plan", "therapy"],
        confirmation: None,
        min_score: 2,
        booster: None,
    },
    CategorySpec {
        id: "icu",
        keywords: &["icu", "intensive care", "critical care"],
        confirmation: None,
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "gcs",
        keywords: &["gcs", "glasgow coma scale"],
        confirmation: None,
        min_score: 1,
        booster: None,
    },
    CategorySpec {
        id: "lab_report",
        keywords: &["lab report", "hematology", "biochemistry", "pathology"],
        confirmation: None,
        min_score: 2,
        booster: None,
    },
    CategorySpec {
        id: "vital_chart",
        keywords: &["vitals chart", "vital signs", "temperature", "pulse", "respiration"],
        confirmation: None,
        min_score: 1,
        booster: Some(BoosterSpec {
            pattern: VITAL_READING_PATTERN,
            boost: VITAL_READING_BOOST,
        }),
    },
];

#[derive(Debug)]
pub struct Booster {
    pattern: Regex,
    boost: usize,
}

#[derive(Debug)]
pub struct Category {
    pub id: &'static str,
    pub keywords: &'static [&'static str],
    pub confirmation: Option<&'static [&'static str]>,
    pub min_score: usize,
    booster: Option<Booster>,
}

impl Category {
    pub fn score(&self, text: &str) -> usize {
        let mut score = count_present(self.keywords, text);
        if let Some(booster) = &self.booster
            && booster.pattern.is_match(text)
        {
            score += booster.boost;
        }
        score
    }

    pub fn confirmation_hits(&self, text: &str) -> Option<usize> {
        self.confirmation
            .map(|keywords| count_present(keywords, text))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredCategory<'a> {
    pub category: &'a Category,
    pub score: usize,
}

#[derive(Debug)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    pub fn structured() -> Result<Self> {
        Self::compile(STRUCTURED_CATEGORIES)
    }

    pub fn unstructured() -> Result<Self> {
        Self::compile(UNSTRUCTURED_CATEGORIES)
    }

    fn compile(specs: &[CategorySpec]) -> Result<Self> {
        let mut categories = Vec::with_capacity(specs.len());
        for spec in specs {
            let booster = match &spec.booster {
                Some(booster) => Some(Booster {
                    pattern: Regex::new(booster.pattern).with_context(|| {
                        format!("failed to compile booster regex for category {}", spec.id)
                    })?,
                    boost: booster.boost,
                }),
                None => None,
            };

            categories.push(Category {
                id: spec.id,
                keywords: spec.keywords,
                confirmation: spec.confirmation,
                min_score: spec.min_score.max(1),
                booster,
            });
        }

        Ok(Self { categories })
    }

    #[cfg(test)]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Highest-scoring category that meets its own threshold. Equal scores
    /// keep the category registered first.
    pub fn best_match(&self, text: &str) -> Option<ScoredCategory<'_>> {
        if text.is_empty() {
            return None;
        }

        let mut best: Option<ScoredCategory<'_>> = None;
        for category in &self.categories {
            let score = category.score(text);
            if score < category.min_score {
                continue;
            }
            if best.is_none_or(|current| score > current.score) {
                best = Some(ScoredCategory { category, score });
            }
        }

        best
    }
}

fn count_present(keywords: &[&str], text: &str) -> usize {
    keywords
        .iter()
        .filter(|keyword| text.contains(**keyword))
        .count()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn taxonomies_have_unique_ids_and_lowercase_keywords() {
        for taxonomy in [Taxonomy::structured().unwrap(), Taxonomy::unstructured().unwrap()] {
            let mut seen = HashSet::new();
            for category in taxonomy.categories() {
                assert!(seen.insert(category.id), "duplicate id {}", category.id);
                assert!(category.min_score >= 1);
                for keyword in category.keywords {
                    assert_eq!(*keyword, keyword.to_lowercase());
                }
            }
        }
    }

    #[test]
    fn best_match_counts_keyword_substrings() {
        let taxonomy = Taxonomy::structured().unwrap();
        let matched = taxonomy.best_match("initial assessment form").unwrap();
        assert_eq!(matched.category.id, "assessment");
        assert_eq!(matched.score, 2);
    }

    #[test]
    fn best_match_prefers_earlier_category_on_tie() {
        let taxonomy = Taxonomy::structured().unwrap();
        let matched = taxonomy.best_match("case sheet vitals chart").unwrap();
        assert_eq!(matched.category.id, "patient_record");
        assert_eq!(matched.score, 1);

        let reversed = taxonomy.best_match("vitals chart case sheet").unwrap();
        assert_eq!(reversed.category.id, "patient_record");
    }

    #[test]
    fn best_match_prefers_higher_score_over_registration_order() {
        let taxonomy = Taxonomy::structured().unwrap();
        let matched = taxonomy
            .best_match("case sheet nursing assessment initial assessment")
            .unwrap();
        assert_eq!(matched.category.id, "assessment");
        assert_eq!(matched.score, 3);
    }

    #[test]
    fn best_match_returns_none_without_candidates() {
        let taxonomy = Taxonomy::structured().unwrap();
        assert!(taxonomy.best_match("").is_none());
        assert!(taxonomy.best_match("nothing relevant here").is_none());
    }

    #[test]
    fn vital_chart_boost_applies_to_reading_patterns() {
        let taxonomy = Taxonomy::unstructured().unwrap();

        let matched = taxonomy.best_match("vitals chart bp 120/80").unwrap();
        assert_eq!(matched.category.id, "vital_chart");
        assert_eq!(matched.score, 3);

        for reading in ["spo2 98", "pulse 72", "temp 99", "paracetamol 500 mg"] {
            let category = taxonomy
                .categories()
                .iter()
                .find(|category| category.id == "vital_chart")
                .unwrap();
            assert!(category.score(reading) >= VITAL_READING_BOOST, "{reading}");
        }
    }

    #[test]
    fn multi_signal_categories_need_two_hits() {
        let taxonomy = Taxonomy::unstructured().unwrap();
        assert!(taxonomy.best_match("prescription").is_none());

        let matched = taxonomy.best_match("prescription dosage").unwrap();
        assert_eq!(matched.category.id, "drug");
        assert_eq!(matched.score, 2);
    }

    #[test]
    fn confirmation_hits_absent_without_rule() {
        let taxonomy = Taxonomy::structured().unwrap();
        let record = &taxonomy.categories()[0];
        assert_eq!(record.id, "patient_record");
        assert_eq!(record.confirmation_hits("bp pulse"), None);

        let vitals = &taxonomy.categories()[1];
        assert_eq!(vitals.confirmation_hits("bp 120/80 pulse 72"), Some(2));
    }
}
