use std::collections::HashMap;

use super::*;

#[derive(Default)]
struct StaticText {
    bands: HashMap<Region, String>,
    requested: Vec<Region>,
}

impl StaticText {
    fn with(mut self, region: Region, text: &str) -> Self {
        self.bands.insert(region, text.to_string());
        self
    }
}

impl PageText for StaticText {
    fn region(&mut self, region: Region) -> String {
        self.requested.push(region);
        self.bands.get(&region).cloned().unwrap_or_default()
    }
}

fn structured() -> ClassificationStrategy {
    ClassificationStrategy::structured().unwrap()
}

fn unstructured() -> ClassificationStrategy {
    ClassificationStrategy::unstructured().unwrap()
}

fn expect_match(classification: Classification) -> CategoryMatch {
    match classification {
        Classification::Matched(found) => found,
        Classification::Unclassified => panic!("expected a category"),
    }
}

#[test]
fn header_case_sheet_is_patient_record() {
    let mut text = StaticText::default().with(Region::Header, "case sheet");
    let found = expect_match(structured().classify(&mut text));

    assert_eq!(found.category, "patient_record");
    assert_eq!(found.confidence, Confidence::Confirmed);
    assert_eq!(found.region, Region::Header);
    assert_eq!(found.label(), "patient_record");
}

#[test]
fn weak_header_defers_to_footer_and_body_confirms() {
    let mut text = StaticText::default()
        .with(Region::Header, "ab 12/03")
        .with(Region::Footer, "vitals chart")
        .with(Region::Body, "bp 120/80 pulse 72");
    let found = expect_match(structured().classify(&mut text));

    assert_eq!(found.category, "vitals_chart");
    assert_eq!(found.region, Region::Footer);
    assert_eq!(found.confidence, Confidence::Confirmed);
    assert_eq!(found.label(), "vitals_chart");
}

#[test]
fn single_body_hit_leaves_category_uncertain() {
    let mut text = StaticText::default()
        .with(Region::Footer, "vitals chart")
        .with(Region::Body, "bp 120/80");
    let found = expect_match(structured().classify(&mut text));

    assert_eq!(found.confidence, Confidence::Uncertain);
    assert_eq!(found.label(), "vitals_chart_uncertain");
}

#[test]
fn unconfirmed_assessment_is_uncertain() {
    let mut text = StaticText::default()
        .with(Region::Header, "initial assessment")
        .with(Region::Body, "patient resting comfortably");
    let found = expect_match(structured().classify(&mut text));

    assert_eq!(found.category, "assessment");
    assert_eq!(found.label(), "assessment_uncertain");
    assert_eq!(text.requested, vec![Region::Header, Region::Body]);
}

#[test]
fn footer_match_overrides_weak_header_match() {
    let mut text = StaticText::default()
        .with(Region::Header, "mri")
        .with(Region::Footer, "consent form");
    let found = expect_match(structured().classify(&mut text));

    assert_eq!(found.category, "consent_form");
    assert_eq!(found.region, Region::Footer);
}

#[test]
fn weak_header_match_stands_when_footer_is_silent() {
    let mut text = StaticText::default()
        .with(Region::Header, "mri")
        .with(Region::Footer, "signature")
        .with(Region::Body, "findings impression normal study");
    let found = expect_match(structured().classify(&mut text));

    assert_eq!(found.category, "radiology_report");
    assert_eq!(found.region, Region::Header);
    assert_eq!(found.confidence, Confidence::Confirmed);
}

#[test]
fn full_page_fallback_confirms_against_full_text() {
    let mut text = StaticText::default()
        .with(Region::Body, "unrelated")
        .with(Region::FullPage, "discharge summary diagnosis advice");
    let found = expect_match(structured().classify(&mut text));

    assert_eq!(found.category, "discharge_summary");
    assert_eq!(found.region, Region::FullPage);
    assert_eq!(found.confidence, Confidence::Confirmed);
    assert_eq!(
        text.requested,
        vec![Region::Header, Region::Footer, Region::FullPage]
    );
}

#[test]
fn full_page_fallback_can_be_uncertain() {
    let mut text = StaticText::default().with(Region::FullPage, "lab report attached");
    let found = expect_match(structured().classify(&mut text));

    assert_eq!(found.label(), "lab_report_uncertain");
}

#[test]
fn structured_without_any_match_is_unclassified() {
    let mut text = StaticText::default()
        .with(Region::Header, "city hospital")
        .with(Region::FullPage, "city hospital page 4");
    assert_eq!(structured().classify(&mut text), Classification::Unclassified);
}

#[test]
fn classification_is_deterministic() {
    let strategy = structured();
    let build = || {
        StaticText::default()
            .with(Region::Header, "case sheet vitals chart")
            .with(Region::Body, "bp pulse")
    };

    let first = strategy.classify(&mut build());
    let second = strategy.classify(&mut build());
    assert_eq!(first, second);
    assert_eq!(expect_match(first).category, "patient_record");
}

#[test]
fn unstructured_boost_selects_vital_chart() {
    let mut text = StaticText::default().with(Region::FullPage, "vitals chart bp 120/80");
    let found = expect_match(unstructured().classify(&mut text));

    assert_eq!(found.category, "vital_chart");
    assert_eq!(found.score, 3);
    assert_eq!(found.region, Region::FullPage);
    assert_eq!(found.confidence, Confidence::Confirmed);
    assert_eq!(text.requested, vec![Region::FullPage]);
}

#[test]
fn unstructured_below_threshold_is_unclassified() {
    let mut text = StaticText::default().with(Region::FullPage, "treatment plan discussed");
    assert_eq!(unstructured().classify(&mut text), Classification::Unclassified);
}

#[test]
fn strategy_follows_document_type() {
    let digital = ClassificationStrategy::for_document(DocumentType::Digital).unwrap();
    assert_eq!(digital.name(), "structured");
    assert_eq!(digital.naming_policy(), NamingPolicy::PageQualified);

    let scanned = ClassificationStrategy::for_document(DocumentType::Scanned).unwrap();
    assert_eq!(scanned.name(), "unstructured");
    assert_eq!(scanned.naming_policy(), NamingPolicy::CategorySuffixed);
}
