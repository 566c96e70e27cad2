use serde::Serialize;

use crate::stats::statistics::ActivityStatistics;

/// Lower bound on the approximate active user count
pub const MIN_ACTIVE_USERS: u64 = 5;
/// Lower bound on the divisor used to approximate active users
pub const MIN_USER_DIVISOR: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Bucket a risk score. Thresholds are inclusive on the higher level.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => RiskLevel::Critical,
            s if s >= 60.0 => RiskLevel::High,
            s if s >= 40.0 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    pub fn color_name(&self) -> &'static str {
        match self {
            RiskLevel::Low => "green",
            RiskLevel::Medium => "yellow",
            RiskLevel::High => "orange",
            RiskLevel::Critical => "red",
        }
    }

    /// Hex colour used by styled outputs
    pub fn color_hex(&self) -> &'static str {
        match self {
            RiskLevel::Low => "#10b981",
            RiskLevel::Medium => "#f59e0b",
            RiskLevel::High => "#f97316",
            RiskLevel::Critical => "#ef4444",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn high_risk_count(stats: &ActivityStatistics) -> u64 {
    stats
        .risk_score_distribution
        .high
        .saturating_add(stats.risk_score_distribution.critical)
}

pub fn breach_count(stats: &ActivityStatistics) -> u64 {
    stats
        .breach_category_breakdown
        .values()
        .fold(0u64, |acc, n| acc.saturating_add(*n))
}

/// `max(5, round(total / max(10, distinct integrations)))`
pub fn active_users(stats: &ActivityStatistics) -> u64 {
    let integrations = stats.integration_breakdown.len() as u64;
    let divisor = integrations.max(MIN_USER_DIVISOR);
    let estimate = (stats.total_activities as f64 / divisor as f64).round() as u64;
    estimate.max(MIN_ACTIVE_USERS)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PanelValue {
    Count(u64),
    Score(f64),
}

/// One of the five fixed dashboard panels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatPanel {
    pub title: &'static str,
    pub value: PanelValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<RiskLevel>,
}

/// Derived counters displayed for an [`ActivityStatistics`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_activities: u64,
    pub high_risk_count: u64,
    pub breach_count: u64,
    pub active_users: u64,
    pub average_risk_score: f64,
    pub risk_level: RiskLevel,
}

impl StatsSummary {
    pub fn from_statistics(stats: &ActivityStatistics) -> Self {
        Self {
            total_activities: stats.total_activities,
            high_risk_count: high_risk_count(stats),
            breach_count: breach_count(stats),
            active_users: active_users(stats),
            average_risk_score: stats.average_risk_score,
            risk_level: RiskLevel::from_score(stats.average_risk_score),
        }
    }

    pub fn panels(&self) -> [StatPanel; 5] {
        [
            StatPanel {
                title: "Total Activities",
                value: PanelValue::Count(self.total_activities),
                level: None,
            },
            StatPanel {
                title: "High Risk",
                value: PanelValue::Count(self.high_risk_count),
                level: None,
            },
            StatPanel {
                title: "Breaches",
                value: PanelValue::Count(self.breach_count),
                level: None,
            },
            StatPanel {
                title: "Active Users",
                value: PanelValue::Count(self.active_users),
                level: None,
            },
            StatPanel {
                title: "Avg Risk Score",
                value: PanelValue::Score(self.average_risk_score),
                level: Some(self.risk_level),
            },
        ]
    }
}
