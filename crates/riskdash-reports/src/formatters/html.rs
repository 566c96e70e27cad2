use std::fmt::Write;

use riskdash_core::preview::render_preview;
use riskdash_core::{RowRecord, StatsSummary};

use crate::{utils::numbers::format_panel_value, Reporter};

const PANEL_STYLE: &str =
    "display:inline-block;min-width:140px;margin:8px;padding:16px;border-radius:8px;background:#1f2937;color:#f9fafb";

/// Collects uploads as styled HTML panels
pub struct HtmlFormatter {
    preview_limit: usize,
    sections: Vec<String>,
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl HtmlFormatter {
    pub fn new(preview_limit: usize) -> Self {
        Self {
            preview_limit,
            sections: Vec::new(),
        }
    }

    pub fn render_summary(summary: &StatsSummary) -> String {
        let mut html = String::from("<div class=\"stats-panels\">\n");
        for panel in summary.panels() {
            let value_style = match panel.level {
                Some(level) => format!(
                    " style=\"color:{}\" data-level=\"{}\"",
                    level.color_hex(),
                    level
                ),
                None => String::new(),
            };
            let _ = writeln!(
                html,
                "  <div class=\"panel\" style=\"{}\"><div class=\"title\">{}</div><div class=\"value\"{}>{}</div></div>",
                PANEL_STYLE,
                escape(panel.title),
                value_style,
                format_panel_value(&panel.value)
            );
        }
        html.push_str("</div>\n");
        html
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from("<section class=\"riskdash-report\">\n");
        for section in &self.sections {
            html.push_str(section);
        }
        html.push_str("</section>\n");
        html
    }
}

impl Reporter for HtmlFormatter {
    fn on_start(&self) {}

    fn on_loading(&self, _name: &str) {}

    fn on_file_load(&mut self, name: &str, n_rows: usize) {
        self.sections.push(format!(
            "<p class=\"loaded\">Loaded {} rows from {}</p>\n",
            n_rows,
            escape(name)
        ));
    }

    fn on_preview(&mut self, name: &str, rows: &[RowRecord]) {
        let body = render_preview(rows, self.preview_limit).unwrap_or_else(|e| e.to_string());
        self.sections.push(format!(
            "<h3>{} ({} rows)</h3>\n<pre class=\"preview\">{}</pre>\n",
            escape(name),
            rows.len(),
            escape(&body)
        ));
    }

    fn on_summary(&mut self, name: &str, summary: &StatsSummary) {
        self.sections
            .push(format!("<h3>{}</h3>\n{}", escape(name), Self::render_summary(summary)));
    }

    fn on_error(&mut self, message: &str) {
        self.sections.push(format!(
            "<div class=\"error\" style=\"color:#ef4444\">{}</div>\n",
            escape(message)
        ));
    }

    fn on_waiting(&self, _dir: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskdash_core::ActivityStatistics;

    #[test]
    fn test_score_panel_colored() {
        let summary = StatsSummary::from_statistics(&ActivityStatistics {
            average_risk_score: 65.0,
            ..Default::default()
        });
        let html = HtmlFormatter::render_summary(&summary);
        assert_eq!(html.matches("class=\"panel\"").count(), 5);
        assert!(html.contains("color:#f97316"));
        assert!(html.contains("data-level=\"high\""));
    }

    #[test]
    fn test_preview_is_escaped() {
        let rows: Vec<RowRecord> = vec![[("note", "<script>")].into_iter().collect()];
        let mut formatter = HtmlFormatter::new(10);
        formatter.on_preview("x.csv", &rows);
        let html = formatter.to_html();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_empty_preview_placeholder() {
        let mut formatter = HtmlFormatter::new(10);
        formatter.on_preview("empty.csv", &[]);
        assert!(formatter.to_html().contains("No data to preview"));
    }

    #[test]
    fn test_clear_drops_sections() {
        let mut formatter = HtmlFormatter::new(10);
        formatter.on_file_load("old.csv", 2);
        formatter.on_error("boom");
        formatter.clear();
        formatter.on_file_load("new.csv", 1);
        let html = formatter.to_html();
        assert!(html.contains("Loaded 1 rows from new.csv"));
        assert!(!html.contains("old.csv"));
        assert!(!html.contains("boom"));
    }
}
