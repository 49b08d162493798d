//! Potential duplicate detection.
//!
//! Two records are potential duplicates when they share series, year and
//! normalized title (lowercased, surrounding whitespace trimmed). Every member
//! of such a group is reported.

use std::collections::HashMap;

use crate::dataset::Dataset;
use crate::types::SurveyRecord;

/// Lowercased, trimmed title used only for comparison.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// All records belonging to a group of two or more potential duplicates,
/// sorted by series, year, then original title.
pub fn find_duplicates(dataset: &Dataset) -> Dataset {
    if dataset.is_empty() {
        return Dataset::default();
    }

    let keys: Vec<(String, &str, &str)> = dataset
        .iter()
        .map(|r| {
            (
                normalize_title(&r.survey_title),
                r.series_name.as_str(),
                r.year.as_str(),
            )
        })
        .collect();

    let mut counts: HashMap<&(String, &str, &str), usize> = HashMap::new();
    for key in &keys {
        *counts.entry(key).or_default() += 1;
    }

    let mut duplicates: Vec<SurveyRecord> = dataset
        .iter()
        .zip(&keys)
        .filter(|(_, key)| counts.get(key).copied().unwrap_or(0) > 1)
        .map(|(record, _)| record.clone())
        .collect();

    duplicates.sort_by(|a, b| {
        a.series_name
            .cmp(&b.series_name)
            .then_with(|| a.year.cmp(&b.year))
            .then_with(|| a.survey_title.cmp(&b.survey_title))
    });

    Dataset::new(duplicates)
}
