//! Integration tests for the scrape → duplicate → export pipeline.
//!
//! The upstream browse API is served by a local `wiremock` server; workbooks
//! are read back with `calamine`.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use calamine::{open_workbook, Data, Reader, Xlsx};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use odesi_browse::export::{SHEET_ALL_DATA, SHEET_DUPLICATES};
use odesi_browse::*;

// ─────────────────────── helpers ───────────────────────

fn lfs_response() -> Value {
    json!({
        "content": {
            "datasets": {
                "items": [
                    {
                        "series": "Labour Force Survey",
                        "years": [
                            {
                                "year": "2001",
                                "item": [
                                    { "title": "LFS 2001 Wave 1", "uri": "doi:10.5683/lfs-2001-a" },
                                    { "title": "LFS 2001 Wave 1", "uri": "doi:10.5683/lfs-2001-b" }
                                ]
                            }
                        ]
                    }
                ]
            }
        }
    })
}

fn config_for(server: &MockServer) -> ScraperConfig {
    ScraperConfig::with_delay(0.0)
        .unwrap()
        .base_url(format!("{}/api/browse", server.uri()))
        .timeout(Duration::from_secs(5))
}

fn sheet_rows(path: &Path, sheet: &str) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range(sheet).unwrap();
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::String(s) => s.clone(),
                    Data::Float(f) => f.to_string(),
                    Data::Int(i) => i.to_string(),
                    Data::Empty => String::new(),
                    other => format!("{other:?}"),
                })
                .collect()
        })
        .collect()
}

fn sheet_names(path: &Path) -> Vec<String> {
    let workbook: Xlsx<_> = open_workbook(path).unwrap();
    workbook.sheet_names()
}

/// Ordered log of the fetches and pauses a scrape performed.
#[derive(Clone, Default)]
struct Trace {
    calls: Arc<Mutex<Vec<String>>>,
}

impl Trace {
    fn push(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

struct RecordingSource(Trace);

#[async_trait]
impl CategorySource for RecordingSource {
    async fn try_fetch(&self, category: &str) -> ScrapeResult<Value> {
        self.0.push(format!("fetch:{category}"));
        Ok(json!({}))
    }
}

struct RecordingPacer(Trace);

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self) {
        self.0.push("pause".to_string());
    }
}

// ═══════════════════════════════════════════════════════
// AGGREGATION
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_two_categories_one_pause_between() {
    let trace = Trace::default();
    let scraper = OdesiScraper::from_parts(
        Box::new(RecordingSource(trace.clone())),
        Box::new(RecordingPacer(trace.clone())),
        Arc::new(NullObserver),
    );

    let categories = vec!["A".to_string(), "B".to_string()];
    let ds = scraper.scrape_all_categories(Some(categories.as_slice())).await;

    assert!(ds.is_empty());
    assert_eq!(trace.entries(), vec!["fetch:A", "pause", "fetch:B"]);
}

#[tokio::test]
async fn test_single_category_never_pauses() {
    let trace = Trace::default();
    let scraper = OdesiScraper::from_parts(
        Box::new(RecordingSource(trace.clone())),
        Box::new(RecordingPacer(trace.clone())),
        Arc::new(NullObserver),
    );

    scraper.scrape_categories(&["Health".to_string()]).await;
    assert_eq!(trace.entries(), vec!["fetch:Health"]);
}

#[tokio::test]
async fn test_default_catalog_fetches_every_category() {
    let trace = Trace::default();
    let scraper = OdesiScraper::from_parts(
        Box::new(RecordingSource(trace.clone())),
        Box::new(RecordingPacer(trace.clone())),
        Arc::new(NullObserver),
    );

    scraper.scrape_all_categories(None).await;
    let entries = trace.entries();
    let fetches = entries.iter().filter(|e| e.starts_with("fetch:")).count();
    let pauses = entries.iter().filter(|e| *e == "pause").count();
    assert_eq!(fetches, CATEGORIES.len());
    assert_eq!(pauses, CATEGORIES.len() - 1);
    assert_eq!(entries.first().map(String::as_str), Some("fetch:Agriculture"));
    assert_eq!(entries.last().map(String::as_str), Some("fetch:Travel"));
}

// ═══════════════════════════════════════════════════════
// HTTP FETCHER
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_fetch_sends_category_and_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/browse"))
        .and(query_param("category", "Crime and Justice"))
        .and(header(
            "user-agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(lfs_response()))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = OdesiScraper::with_observer(config_for(&server), Arc::new(NullObserver)).unwrap();
    let body = scraper.fetch_category("Crime and Justice").await;
    assert_eq!(body, lfs_response());
}

#[tokio::test]
async fn test_server_error_is_an_empty_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let observer = Arc::new(RecordingObserver::new());
    let scraper = OdesiScraper::with_observer(config_for(&server), observer.clone()).unwrap();

    let body = scraper.fetch_category("Health").await;
    assert_eq!(body, json!({}));
    assert_eq!(
        observer.count(|e| matches!(e, ScrapeEvent::FetchFailed { category, .. } if category == "Health")),
        1
    );
}

#[tokio::test]
async fn test_non_json_body_is_an_empty_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let observer = Arc::new(RecordingObserver::new());
    let scraper = OdesiScraper::with_observer(config_for(&server), observer.clone()).unwrap();

    let ds = scraper.scrape_categories(&["Health".to_string()]).await;
    assert!(ds.is_empty());
    assert_eq!(
        observer.count(|e| matches!(e, ScrapeEvent::FetchFailed { .. })),
        1
    );
}

#[tokio::test]
async fn test_timeout_is_an_empty_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(lfs_response())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = config_for(&server).timeout(Duration::from_millis(200));
    let scraper = OdesiScraper::with_observer(config, Arc::new(NullObserver)).unwrap();
    assert_eq!(scraper.fetch_category("Health").await, json!({}));
}

// ═══════════════════════════════════════════════════════
// END TO END
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_health_end_to_end_flags_exact_duplicates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/browse"))
        .and(query_param("category", "Health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lfs_response()))
        .expect(1)
        .mount(&server)
        .await;

    let observer = Arc::new(RecordingObserver::new());
    let scraper = OdesiScraper::with_observer(config_for(&server), observer.clone()).unwrap();
    let ds = scraper
        .scrape_all_categories(Some(&["Health".to_string()][..]))
        .await;

    assert_eq!(ds.len(), 2);
    assert!(ds
        .iter()
        .all(|r| r.category == "Health" && r.series_name == "Labour Force Survey" && r.year == "2001"));

    let dups = scraper.find_duplicates(&ds);
    assert_eq!(dups.len(), 2);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("odesi_data.xlsx");
    let report = scraper.export_to_excel(&ds, &out).unwrap();
    assert_eq!(report.duplicate_records, 2);

    assert_eq!(
        sheet_names(&out),
        vec![
            "All_Data",
            "Category_Summary",
            "Series_Summary",
            "Potential_Duplicates"
        ]
    );

    let all = sheet_rows(&out, SHEET_ALL_DATA);
    assert_eq!(
        all[0],
        vec!["Category", "Series_Name", "Year", "Survey_Title", "URI"]
    );
    assert_eq!(all.len(), 3);
    assert_eq!(
        all[1],
        vec![
            "Health",
            "Labour Force Survey",
            "2001",
            "LFS 2001 Wave 1",
            "doi:10.5683/lfs-2001-a"
        ]
    );

    let summary = sheet_rows(&out, "Category_Summary");
    assert_eq!(summary[1], vec!["Health", "1", "2"]);

    let series = sheet_rows(&out, "Series_Summary");
    assert_eq!(
        series[1],
        vec!["Health", "Labour Force Survey", "2", "2001", "2001"]
    );

    let duplicates = sheet_rows(&out, SHEET_DUPLICATES);
    assert_eq!(duplicates.len(), 3);
}

#[tokio::test]
async fn test_placeholder_datasets_category_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("category", "Geography"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "content": { "datasets": "No datasets found" } })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("category", "Health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lfs_response()))
        .mount(&server)
        .await;

    let observer = Arc::new(RecordingObserver::new());
    let scraper = OdesiScraper::with_observer(config_for(&server), observer.clone()).unwrap();
    let ds = scraper
        .scrape_categories(&["Geography".to_string(), "Health".to_string()])
        .await;

    assert_eq!(ds.len(), 2);
    assert_eq!(
        observer.count(|e| matches!(e, ScrapeEvent::MalformedShape { .. })),
        1
    );
}

#[test]
fn test_export_empty_dataset_writes_only_header() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("empty.xlsx");

    let report = export_to_excel(&Dataset::default(), &out, &NullObserver).unwrap();
    assert_eq!(report.sheets, vec!["All_Data"]);

    assert_eq!(sheet_names(&out), vec!["All_Data"]);
    let rows = sheet_rows(&out, SHEET_ALL_DATA);
    assert_eq!(
        rows,
        vec![vec!["Category", "Series_Name", "Year", "Survey_Title", "URI"]]
    );
}
