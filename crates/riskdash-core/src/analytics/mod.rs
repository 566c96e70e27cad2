pub mod mock;

use serde::Serialize;

pub use mock::MockAnalytics;

/// Default number of days in a generated timeline
pub const DEFAULT_TIMELINE_DAYS: usize = 30;

/// A named slice of a distribution chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionSlice {
    pub name: String,
    pub value: u64,
    pub color: String,
}

impl DistributionSlice {
    pub fn new(name: &str, value: u64, color: &str) -> Self {
        Self {
            name: name.to_string(),
            value,
            color: color.to_string(),
        }
    }
}

/// Activity count per weekday for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserWeeklyActivity {
    pub user: String,
    pub monday: u32,
    pub tuesday: u32,
    pub wednesday: u32,
    pub thursday: u32,
    pub friday: u32,
    pub saturday: u32,
    pub sunday: u32,
}

impl UserWeeklyActivity {
    pub fn total(&self) -> u32 {
        self.monday
            + self.tuesday
            + self.wednesday
            + self.thursday
            + self.friday
            + self.saturday
            + self.sunday
    }
}

/// One day of severity counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineDataPoint {
    pub date: String,
    pub low: u32,
    pub medium: u32,
    pub high: u32,
    pub critical: u32,
    pub total: u32,
}

/// Source of the datasets behind the dashboard charts.
///
/// Display code only talks to this trait so the mock data can be replaced
/// by a real analytics backend.
pub trait AnalyticsProvider {
    fn risk_distribution(&self) -> Vec<DistributionSlice>;
    fn breach_distribution(&self) -> Vec<DistributionSlice>;
    fn user_weekly_activity(&self) -> Vec<UserWeeklyActivity>;
    fn timeline(&self, days: usize) -> Vec<TimelineDataPoint>;
}
