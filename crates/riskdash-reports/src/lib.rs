pub mod formatters;
pub mod utils;

use riskdash_core::{RowRecord, StatsSummary};
pub use formatters::{html::HtmlFormatter, json::JsonFormatter, stdout::StdOutFormatter};

pub trait Reporter {
    fn on_start(&self);
    fn on_loading(&self, name: &str);
    fn on_file_load(&mut self, name: &str, n_rows: usize);
    fn on_preview(&mut self, name: &str, rows: &[RowRecord]);
    fn on_summary(&mut self, name: &str, summary: &StatsSummary);
    fn on_error(&mut self, message: &str);
    fn on_waiting(&self, dir: &str);
}
