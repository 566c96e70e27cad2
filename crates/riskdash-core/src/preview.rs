use crate::errors::Result;
use crate::types::RowRecord;

/// Number of records shown in a preview
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;

pub const EMPTY_PREVIEW: &str = "No data to preview";

/// The first `limit` records, or all of them when there are fewer
pub fn preview_rows(rows: &[RowRecord], limit: usize) -> &[RowRecord] {
    &rows[..rows.len().min(limit)]
}

/// Pretty JSON of the previewed records, or a placeholder when there are none
pub fn render_preview(rows: &[RowRecord], limit: usize) -> Result<String> {
    let shown = preview_rows(rows, limit);
    if shown.is_empty() {
        return Ok(EMPTY_PREVIEW.to_string());
    }
    Ok(serde_json::to_string_pretty(shown)?)
}
