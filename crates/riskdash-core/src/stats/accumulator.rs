use serde::Deserialize;
use tracing::debug;

use crate::stats::statistics::ActivityStatistics;
use crate::stats::summary::RiskLevel;
use crate::types::RowRecord;
use crate::utils::date_parser::parse_hour;

/// Column names read from uploaded activity rows
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatsColumns {
    pub risk_score: String,
    pub integration: String,
    pub status: String,
    pub breach_category: String,
    pub timestamp: String,
}

impl Default for StatsColumns {
    fn default() -> Self {
        Self {
            risk_score: "risk_score".to_string(),
            integration: "integration".to_string(),
            status: "status".to_string(),
            breach_category: "breach_category".to_string(),
            timestamp: "timestamp".to_string(),
        }
    }
}

/// Builds [`ActivityStatistics`] one row at a time
pub struct StatsAccumulator {
    columns: StatsColumns,
    stats: ActivityStatistics,
    score_sum: f64,
    scored: u64,
    skipped_scores: u64,
}

impl StatsAccumulator {
    pub fn new(columns: StatsColumns) -> Self {
        let mut stats = ActivityStatistics::default();
        stats.time_distribution.night = Some(0);
        Self {
            columns,
            stats,
            score_sum: 0.0,
            scored: 0,
            skipped_scores: 0,
        }
    }

    pub fn add_row(&mut self, row: &RowRecord) {
        self.stats.total_activities += 1;

        // Scores that do not parse are left out of the average and the buckets
        match row.parse_field::<f64>(&self.columns.risk_score) {
            Ok(Some(score)) if score.is_finite() => {
                self.score_sum += score;
                self.scored += 1;
                let distribution = &mut self.stats.risk_score_distribution;
                match RiskLevel::from_score(score) {
                    RiskLevel::Low => distribution.low += 1,
                    RiskLevel::Medium => distribution.medium += 1,
                    RiskLevel::High => distribution.high += 1,
                    RiskLevel::Critical => distribution.critical += 1,
                }
            }
            _ => self.skipped_scores += 1,
        }

        if let Some(name) = category(row, &self.columns.integration) {
            *self.stats.integration_breakdown.entry(name).or_default() += 1;
        }
        if let Some(name) = category(row, &self.columns.status) {
            *self.stats.status_breakdown.entry(name).or_default() += 1;
        }
        if let Some(name) = category(row, &self.columns.breach_category) {
            *self.stats.breach_category_breakdown.entry(name).or_default() += 1;
        }

        if let Some(hour) = row.get(&self.columns.timestamp).and_then(parse_hour) {
            let time = &mut self.stats.time_distribution;
            match hour {
                6..=11 => time.morning += 1,
                12..=17 => time.afternoon += 1,
                18..=21 => time.evening += 1,
                _ => *time.night.get_or_insert(0) += 1,
            }
        }
    }

    /// Rows whose risk score was missing or malformed
    pub fn skipped_scores(&self) -> u64 {
        self.skipped_scores
    }

    pub fn finish(mut self) -> ActivityStatistics {
        if self.scored > 0 {
            self.stats.average_risk_score = self.score_sum / self.scored as f64;
        }
        debug!(
            rows = self.stats.total_activities,
            scored = self.scored,
            skipped_scores = self.skipped_scores,
            "activity statistics built"
        );
        self.stats
    }
}

fn category(row: &RowRecord, column: &str) -> Option<String> {
    row.get(column)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Aggregate a full set of uploaded rows
pub fn statistics_from_rows(rows: &[RowRecord], columns: &StatsColumns) -> ActivityStatistics {
    let mut accumulator = StatsAccumulator::new(columns.clone());
    for row in rows {
        accumulator.add_row(row);
    }
    accumulator.finish()
}
