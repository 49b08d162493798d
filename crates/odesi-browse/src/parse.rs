//! Flatten a browse response into survey records.
//!
//! Expected shape:
//!
//! ```text
//! { "content": { "datasets": { "items": [
//!     { "series": "...", "years": [
//!         { "year": "...", "item": [ { "title": "...", "uri": "..." } ] }
//!     ] }
//! ] } } }
//! ```
//!
//! Parsing never fails. Missing keys and wrong types shrink the output; the
//! [`ParseOutcome`] says why nothing came back, and [`ParseOutcome::into_records`]
//! collapses that back to a plain list.

use serde_json::{Map, Value};

use crate::observe::{ScrapeEvent, ScrapeObserver};
use crate::types::{SurveyRecord, UNKNOWN_LABEL};

/// Result of flattening one category response.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// At least one survey was found.
    Records(Vec<SurveyRecord>),
    /// The response carried nothing for this category.
    Empty,
    /// The response did not have the expected nesting.
    MalformedShape(String),
}

impl ParseOutcome {
    /// Records found, with `Empty` and `MalformedShape` both yielding none.
    pub fn into_records(self) -> Vec<SurveyRecord> {
        match self {
            Self::Records(records) => records,
            Self::Empty | Self::MalformedShape(_) => Vec::new(),
        }
    }
}

/// Walk the response for `category` and flatten every survey under it.
pub fn parse_category(category: &str, data: &Value) -> ParseOutcome {
    let Some(root) = data.as_object().filter(|o| !o.is_empty()) else {
        return ParseOutcome::Empty;
    };
    let Some(content) = root.get("content") else {
        return ParseOutcome::Empty;
    };
    let Some(content) = content.as_object() else {
        return ParseOutcome::MalformedShape(format!("content is {}", json_type(content)));
    };

    let empty = Map::new();
    let datasets = match content.get("datasets") {
        None => &empty,
        Some(Value::Object(datasets)) => datasets,
        Some(other) => {
            return ParseOutcome::MalformedShape(format!("datasets is {}", json_type(other)));
        }
    };

    let mut records = Vec::new();

    for series_item in array_entries(datasets, "items") {
        let series_name = label(series_item, "series", UNKNOWN_LABEL);

        for year_data in array_entries(series_item, "years") {
            let year = label(year_data, "year", UNKNOWN_LABEL);

            for survey in array_entries(year_data, "item") {
                records.push(SurveyRecord {
                    category: category.to_string(),
                    series_name: series_name.clone(),
                    year: year.clone(),
                    survey_title: label(survey, "title", ""),
                    uri: label(survey, "uri", ""),
                });
            }
        }
    }

    if records.is_empty() {
        ParseOutcome::Empty
    } else {
        ParseOutcome::Records(records)
    }
}

/// Parse and report the outcome, returning the records for the category.
pub fn parse_and_report(
    category: &str,
    data: &Value,
    observer: &dyn ScrapeObserver,
) -> Vec<SurveyRecord> {
    let outcome = parse_category(category, data);
    let category = category.to_string();

    match &outcome {
        ParseOutcome::Records(records) => observer.on_event(&ScrapeEvent::CategoryParsed {
            category,
            records: records.len(),
        }),
        ParseOutcome::Empty => {
            if has_content(data) {
                observer.on_event(&ScrapeEvent::CategoryParsed {
                    category,
                    records: 0,
                });
            } else {
                observer.on_event(&ScrapeEvent::NoData { category });
            }
        }
        ParseOutcome::MalformedShape(reason) => observer.on_event(&ScrapeEvent::MalformedShape {
            category,
            reason: reason.clone(),
        }),
    }

    outcome.into_records()
}

fn has_content(data: &Value) -> bool {
    data.get("content").is_some()
}

/// Object entries of the array at `key`; non-arrays and non-object entries are skipped.
fn array_entries<'a>(
    parent: &'a Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a Map<String, Value>> {
    parent
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// A scalar field rendered as text, or `default` when absent or not a scalar.
fn label(obj: &Map<String, Value>, key: &str, default: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => default.to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
