//! The ordered record table plus the summaries derived from it.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::types::SurveyRecord;

/// Ordered survey records, in category-processing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub records: Vec<SurveyRecord>,
}

/// Per-category counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub unique_series: usize,
    pub total_surveys: usize,
}

/// Per-(category, series) counts and year range.
///
/// `first_year` / `last_year` are the string minimum and maximum of the year
/// labels, so `"2010"` sorts before `"999"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesSummary {
    pub category: String,
    pub series_name: String,
    pub survey_count: usize,
    pub first_year: String,
    pub last_year: String,
}

/// Headline numbers for a scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub total_records: usize,
    pub categories: usize,
    pub unique_series: usize,
    /// Series names by survey count, most first.
    pub top_series: Vec<(String, usize)>,
}

impl Dataset {
    pub fn new(records: Vec<SurveyRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SurveyRecord> {
        self.records.iter()
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = SurveyRecord>) {
        self.records.extend(records);
    }

    /// Number of distinct categories.
    pub fn category_count(&self) -> usize {
        self.iter()
            .map(|r| r.category.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Number of distinct series names across all categories.
    pub fn unique_series_count(&self) -> usize {
        self.iter()
            .map(|r| r.series_name.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// One row per category, sorted by category name.
    pub fn category_summary(&self) -> Vec<CategorySummary> {
        let mut groups: BTreeMap<&str, (BTreeSet<&str>, usize)> = BTreeMap::new();
        for r in self.iter() {
            let entry = groups.entry(r.category.as_str()).or_default();
            entry.0.insert(r.series_name.as_str());
            entry.1 += 1;
        }

        groups
            .into_iter()
            .map(|(category, (series, total))| CategorySummary {
                category: category.to_string(),
                unique_series: series.len(),
                total_surveys: total,
            })
            .collect()
    }

    /// One row per (category, series), sorted by category then series.
    pub fn series_summary(&self) -> Vec<SeriesSummary> {
        let mut groups: BTreeMap<(&str, &str), (usize, &str, &str)> = BTreeMap::new();
        for r in self.iter() {
            let year = r.year.as_str();
            groups
                .entry((r.category.as_str(), r.series_name.as_str()))
                .and_modify(|(count, first, last)| {
                    *count += 1;
                    *first = (*first).min(year);
                    *last = (*last).max(year);
                })
                .or_insert((1, year, year));
        }

        groups
            .into_iter()
            .map(|((category, series), (count, first, last))| SeriesSummary {
                category: category.to_string(),
                series_name: series.to_string(),
                survey_count: count,
                first_year: first.to_string(),
                last_year: last.to_string(),
            })
            .collect()
    }

    /// The `limit` series with the most surveys; ties go to the smaller name.
    pub fn top_series(&self, limit: usize) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for r in self.iter() {
            *counts.entry(r.series_name.as_str()).or_default() += 1;
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect()
    }

    pub fn stats(&self, top_n: usize) -> DatasetStats {
        DatasetStats {
            total_records: self.len(),
            categories: self.category_count(),
            unique_series: self.unique_series_count(),
            top_series: self.top_series(top_n),
        }
    }
}

impl From<Vec<SurveyRecord>> for Dataset {
    fn from(records: Vec<SurveyRecord>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a SurveyRecord;
    type IntoIter = std::slice::Iter<'a, SurveyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
