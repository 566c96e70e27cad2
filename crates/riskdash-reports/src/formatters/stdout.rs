use prettytable::{Cell, Row, Table};
use riskdash_core::analytics::{DistributionSlice, TimelineDataPoint, UserWeeklyActivity};
use riskdash_core::preview::render_preview;
use riskdash_core::{RiskLevel, RowRecord, StatsSummary};

use crate::{utils::numbers::format_panel_value, Reporter};

pub struct StdOutFormatter {
    intro: String,
    intro_len: usize,
    preview_limit: usize,
}

fn level_style(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical => "bFr",
        RiskLevel::High => "bFY",
        RiskLevel::Medium => "Fy",
        RiskLevel::Low => "Fg",
    }
}

impl StdOutFormatter {
    pub fn new(version: String, preview_limit: usize) -> Self {
        let s = format!("RiskDash v{} - User Activity Risk", version);
        let n = s.len();
        Self {
            intro: s,
            intro_len: n,
            preview_limit,
        }
    }

    pub fn print_loading_start(&self, name: &str) {
        println!("Loading {}...", name);
    }

    pub fn print_file_loaded(&self, name: &str, n_rows: usize) {
        println!("Loaded {} rows from {}", n_rows, name);
    }

    pub fn render_summary(&self, summary: &StatsSummary) -> String {
        let panels = summary.panels();
        let mut table = Table::new();
        table.add_row(Row::new(
            panels.iter().map(|p| Cell::new(p.title).style_spec("b")).collect(),
        ));
        table.add_row(Row::new(
            panels
                .iter()
                .map(|p| {
                    let cell = Cell::new(&format_panel_value(&p.value));
                    match p.level {
                        Some(level) => cell.style_spec(level_style(level)),
                        None => cell,
                    }
                })
                .collect(),
        ));
        format!(
            "{}Risk level: {} ({})\n",
            table,
            summary.risk_level,
            summary.risk_level.color_name()
        )
    }

    pub fn print_summary(&self, name: &str, summary: &StatsSummary) {
        println!("\n{}", name);
        print!("{}", self.render_summary(summary));
    }

    pub fn print_preview(&self, name: &str, rows: &[RowRecord]) {
        println!("\n{} ({} rows)", name, rows.len());
        match render_preview(rows, self.preview_limit) {
            Ok(text) => println!("{}", text),
            Err(e) => println!("  Error: {}", e),
        }
    }

    pub fn render_distribution(&self, slices: &[DistributionSlice]) -> String {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("Category"),
            Cell::new("Value"),
            Cell::new("Color"),
        ]));
        for slice in slices {
            table.add_row(Row::new(vec![
                Cell::new(&slice.name),
                Cell::new(&slice.value.to_string()),
                Cell::new(&slice.color),
            ]));
        }
        table.to_string()
    }

    pub fn render_weekly(&self, rows: &[UserWeeklyActivity]) -> String {
        let mut table = Table::new();
        table.add_row(Row::new(
            ["User", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun", "Total"]
                .iter()
                .map(|h| Cell::new(h))
                .collect(),
        ));
        for r in rows {
            let counts = [
                r.monday,
                r.tuesday,
                r.wednesday,
                r.thursday,
                r.friday,
                r.saturday,
                r.sunday,
                r.total(),
            ];
            let mut cells = vec![Cell::new(&r.user)];
            cells.extend(counts.iter().map(|c| Cell::new(&c.to_string())));
            table.add_row(Row::new(cells));
        }
        table.to_string()
    }

    pub fn render_timeline(&self, points: &[TimelineDataPoint]) -> String {
        let mut table = Table::new();
        table.add_row(Row::new(
            ["Date", "Low", "Medium", "High", "Critical", "Total"]
                .iter()
                .map(|h| Cell::new(h))
                .collect(),
        ));
        for p in points {
            table.add_row(Row::new(vec![
                Cell::new(&p.date),
                Cell::new(&p.low.to_string()),
                Cell::new(&p.medium.to_string()),
                Cell::new(&p.high.to_string()),
                Cell::new(&p.critical.to_string()).style_spec(level_style(RiskLevel::Critical)),
                Cell::new(&p.total.to_string()),
            ]));
        }
        table.to_string()
    }

    pub fn print_error(&self, message: &str) {
        println!("  Error: {}", message);
    }

    pub fn print_waiting(&self, dir: &str) {
        let i = "=".repeat(self.intro_len);

        println!("\n{}", i);
        println!("Waiting for CSV files in {}...", dir);
    }
}

impl Reporter for StdOutFormatter {
    fn on_start(&self) {
        let i = "=".repeat(self.intro_len);

        println!("{}", self.intro);
        println!("{}", i);
    }

    fn on_loading(&self, name: &str) {
        self.print_loading_start(name);
    }

    fn on_file_load(&mut self, name: &str, n_rows: usize) {
        self.print_file_loaded(name, n_rows);
    }

    fn on_preview(&mut self, name: &str, rows: &[RowRecord]) {
        self.print_preview(name, rows);
    }

    fn on_summary(&mut self, name: &str, summary: &StatsSummary) {
        self.print_summary(name, summary);
    }

    fn on_error(&mut self, message: &str) {
        self.print_error(message);
    }

    fn on_waiting(&self, dir: &str) {
        self.print_waiting(dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskdash_core::analytics::{AnalyticsProvider, MockAnalytics};
    use riskdash_core::ActivityStatistics;

    fn formatter() -> StdOutFormatter {
        StdOutFormatter::new("0.1.0".to_string(), 10)
    }

    #[test]
    fn test_render_summary_contains_panels() {
        let stats = ActivityStatistics {
            total_activities: 1000,
            average_risk_score: 85.0,
            ..Default::default()
        };
        let text = formatter().render_summary(&StatsSummary::from_statistics(&stats));
        assert!(text.contains("Total Activities"));
        assert!(text.contains("Avg Risk Score"));
        assert!(text.contains("1000"));
        assert!(text.contains("85.0"));
        assert!(text.contains("critical (red)"));
    }

    #[test]
    fn test_render_distribution() {
        let mock = MockAnalytics::new();
        let text = formatter().render_distribution(&mock.breach_distribution());
        assert!(text.contains("Data Exfiltration"));
        assert!(text.contains("#ef4444"));
    }

    #[test]
    fn test_render_weekly_has_totals() {
        let mock = MockAnalytics::new();
        let text = formatter().render_weekly(&mock.user_weekly_activity());
        assert!(text.contains("alice.martin"));
        assert!(text.contains("145"));
    }
}
