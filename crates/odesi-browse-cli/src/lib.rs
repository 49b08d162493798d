//! ODESI browse CLI — settings resolution and the `scrape` command.

pub mod config;
pub mod run;

pub use config::{RunSettings, ScrapeArgs};
pub use run::{render_summary, run, run_with_observer, RunSummary};
