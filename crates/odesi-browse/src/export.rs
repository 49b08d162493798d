//! Multi-sheet `.xlsx` export.
//!
//! The sheet layout is built as a [`WorkbookPlan`] first, then written with
//! `rust_xlsxwriter`. Summary and duplicate sheets are only planned for a
//! non-empty dataset; the duplicate sheet only when duplicates exist.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde::Serialize;

use crate::dataset::Dataset;
use crate::duplicates::find_duplicates;
use crate::observe::{ScrapeEvent, ScrapeObserver};
use crate::types::{ScrapeResult, RECORD_COLUMNS};

pub const SHEET_ALL_DATA: &str = "All_Data";
pub const SHEET_CATEGORY_SUMMARY: &str = "Category_Summary";
pub const SHEET_SERIES_SUMMARY: &str = "Series_Summary";
pub const SHEET_DUPLICATES: &str = "Potential_Duplicates";

/// Most characters Excel stores in one cell.
pub const MAX_CELL_CHARS: usize = 32_767;

const CATEGORY_SUMMARY_COLUMNS: [&str; 3] = ["Category", "Unique_Series", "Total_Surveys"];
const SERIES_SUMMARY_COLUMNS: [&str; 5] = [
    "Category",
    "Series_Name",
    "Survey_Count",
    "First_Year",
    "Last_Year",
];

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn text(s: &str) -> Self {
        Self::Text(s.to_string())
    }

    fn count(n: usize) -> Self {
        Self::Number(n as f64)
    }
}

/// One sheet: a header row followed by data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

/// Everything that will be written, in sheet order.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookPlan {
    pub sheets: Vec<SheetPlan>,
    /// Records in the duplicates sheet (0 when it is absent).
    pub duplicate_records: usize,
}

impl WorkbookPlan {
    pub fn sheet(&self, name: &str) -> Option<&SheetPlan> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&'static str> {
        self.sheets.iter().map(|s| s.name).collect()
    }
}

/// What an export wrote.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub path: PathBuf,
    pub sheets: Vec<String>,
    pub records: usize,
    pub duplicate_records: usize,
    /// Text cells cut to [`MAX_CELL_CHARS`].
    pub truncated_cells: usize,
}

/// Lay out the workbook for `dataset`.
pub fn plan_workbook(dataset: &Dataset) -> WorkbookPlan {
    let mut sheets = vec![record_sheet(SHEET_ALL_DATA, dataset)];

    if dataset.is_empty() {
        return WorkbookPlan {
            sheets,
            duplicate_records: 0,
        };
    }

    sheets.push(SheetPlan {
        name: SHEET_CATEGORY_SUMMARY,
        headers: CATEGORY_SUMMARY_COLUMNS.to_vec(),
        rows: dataset
            .category_summary()
            .iter()
            .map(|s| {
                vec![
                    Cell::text(&s.category),
                    Cell::count(s.unique_series),
                    Cell::count(s.total_surveys),
                ]
            })
            .collect(),
    });

    sheets.push(SheetPlan {
        name: SHEET_SERIES_SUMMARY,
        headers: SERIES_SUMMARY_COLUMNS.to_vec(),
        rows: dataset
            .series_summary()
            .iter()
            .map(|s| {
                vec![
                    Cell::text(&s.category),
                    Cell::text(&s.series_name),
                    Cell::count(s.survey_count),
                    Cell::text(&s.first_year),
                    Cell::text(&s.last_year),
                ]
            })
            .collect(),
    });

    let duplicates = find_duplicates(dataset);
    let duplicate_records = duplicates.len();
    if !duplicates.is_empty() {
        sheets.push(record_sheet(SHEET_DUPLICATES, &duplicates));
    }

    WorkbookPlan {
        sheets,
        duplicate_records,
    }
}

fn record_sheet(name: &'static str, dataset: &Dataset) -> SheetPlan {
    SheetPlan {
        name,
        headers: RECORD_COLUMNS.to_vec(),
        rows: dataset
            .iter()
            .map(|r| r.columns().iter().map(|v| Cell::text(v)).collect())
            .collect(),
    }
}

/// Write `dataset` and its summaries to `path`.
///
/// Only a failure to write the file is an error. Over-long text is truncated
/// and reported as [`ScrapeEvent::CellsTruncated`].
pub fn export_to_excel(
    dataset: &Dataset,
    path: &Path,
    observer: &dyn ScrapeObserver,
) -> ScrapeResult<ExportReport> {
    observer.on_event(&ScrapeEvent::ExportStarted {
        path: path.display().to_string(),
    });

    let plan = plan_workbook(dataset);
    if plan.duplicate_records > 0 {
        observer.on_event(&ScrapeEvent::DuplicatesFound {
            records: plan.duplicate_records,
        });
    }

    let truncated_cells = write_workbook(&plan, path)?;
    if truncated_cells > 0 {
        observer.on_event(&ScrapeEvent::CellsTruncated {
            cells: truncated_cells,
            limit: MAX_CELL_CHARS,
        });
    }

    observer.on_event(&ScrapeEvent::ExportComplete {
        path: path.display().to_string(),
        sheets: plan.sheets.len(),
    });

    Ok(ExportReport {
        path: path.to_path_buf(),
        sheets: plan.sheet_names().iter().map(|s| s.to_string()).collect(),
        records: dataset.len(),
        duplicate_records: plan.duplicate_records,
        truncated_cells,
    })
}

/// Write a planned workbook, creating parent directories as needed.
///
/// Returns how many text cells had to be truncated.
pub fn write_workbook(plan: &WorkbookPlan, path: &Path) -> ScrapeResult<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let mut truncated = 0;

    for sheet in &plan.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name)?;
        truncated += write_sheet(worksheet, sheet, &header_format)?;
    }

    workbook.save(path)?;
    Ok(truncated)
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &SheetPlan,
    header: &Format,
) -> ScrapeResult<usize> {
    for (col, name) in sheet.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, header)?;
    }

    let mut truncated = 0;
    for (i, row) in sheet.rows.iter().enumerate() {
        let row_num = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(s) => {
                    let text = match fit_to_cell(s) {
                        Some(cut) => {
                            truncated += 1;
                            cut
                        }
                        None => s.as_str(),
                    };
                    worksheet.write_string(row_num, col as u16, text)?
                }
                Cell::Number(n) => worksheet.write_number(row_num, col as u16, *n)?,
            };
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    Ok(truncated)
}

/// The first [`MAX_CELL_CHARS`] characters of `s`, or `None` if it already fits.
fn fit_to_cell(s: &str) -> Option<&str> {
    s.char_indices()
        .nth(MAX_CELL_CHARS)
        .map(|(end, _)| &s[..end])
}
