use chrono::Local;
use riskdash_core::preview::preview_rows;
use riskdash_core::{RowRecord, StatsSummary};
use serde::Serialize;
use serde_json::Error;

use crate::Reporter;

#[derive(Serialize)]
pub struct JsonFormatter {
    version: String,
    timestamp: String,
    #[serde(skip)]
    preview_limit: usize,
    uploads: Vec<UploadFormatter>,
    errors: Vec<String>,
}

#[derive(Serialize)]
struct UploadFormatter {
    name: String,
    n_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<Vec<RowRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<StatsSummary>,
}

impl JsonFormatter {
    pub fn new(version: String, preview_limit: usize) -> Self {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Self {
            version,
            timestamp,
            preview_limit,
            uploads: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self)
    }

    /// Drop collected uploads and errors, restarting the report timestamp
    pub fn clear(&mut self) {
        self.uploads.clear();
        self.errors.clear();
        self.timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    }

    fn upload_mut(&mut self, name: &str) -> &mut UploadFormatter {
        // Preview and summary of the same file land in one entry
        let idx = match self.uploads.iter().position(|u| u.name == name) {
            Some(idx) => idx,
            None => {
                self.uploads.push(UploadFormatter {
                    name: name.to_string(),
                    n_rows: 0,
                    preview: None,
                    summary: None,
                });
                self.uploads.len() - 1
            }
        };
        &mut self.uploads[idx]
    }
}

impl Reporter for JsonFormatter {
    fn on_start(&self) {}

    fn on_loading(&self, _name: &str) {}

    fn on_file_load(&mut self, name: &str, n_rows: usize) {
        self.upload_mut(name).n_rows = n_rows;
    }

    fn on_preview(&mut self, name: &str, rows: &[RowRecord]) {
        let shown = preview_rows(rows, self.preview_limit).to_vec();
        let upload = self.upload_mut(name);
        upload.n_rows = rows.len();
        upload.preview = Some(shown);
    }

    fn on_summary(&mut self, name: &str, summary: &StatsSummary) {
        let upload = self.upload_mut(name);
        upload.n_rows = summary.total_activities as usize;
        upload.summary = Some(summary.clone());
    }

    fn on_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn on_waiting(&self, _dir: &str) {}
}
