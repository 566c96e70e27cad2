use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate description of monitored user activity.
///
/// Every field defaults when absent so partially filled payloads still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityStatistics {
    pub total_activities: u64,
    pub average_risk_score: f64,
    pub risk_score_distribution: RiskDistribution,
    pub integration_breakdown: BTreeMap<String, u64>,
    pub status_breakdown: BTreeMap<String, u64>,
    pub breach_category_breakdown: BTreeMap<String, u64>,
    pub time_distribution: TimeDistribution,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskDistribution {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
    pub critical: u64,
}

impl RiskDistribution {
    pub fn total(&self) -> u64 {
        self.low
            .saturating_add(self.medium)
            .saturating_add(self.high)
            .saturating_add(self.critical)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeDistribution {
    pub morning: u64,
    pub afternoon: u64,
    pub evening: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub night: Option<u64>,
}

impl ActivityStatistics {
    /// Load statistics from a JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
