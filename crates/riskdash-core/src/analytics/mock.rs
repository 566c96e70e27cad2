use chrono::{Days, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::analytics::{AnalyticsProvider, DistributionSlice, TimelineDataPoint, UserWeeklyActivity};

const MAX_LOW: u32 = 20;
const MAX_MEDIUM: u32 = 12;
const MAX_HIGH: u32 = 8;
const MAX_CRITICAL: u32 = 4;

/// Placeholder datasets until a real analytics backend exists.
///
/// Distributions and weekly rows are fixed. Timelines are random and
/// unseeded unless [`MockAnalytics::with_rng_seed`] is used.
#[derive(Debug, Clone, Default)]
pub struct MockAnalytics {
    seed: Option<u64>,
    today: Option<NaiveDate>,
}

impl MockAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rng_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    /// Anchor timelines on `today` instead of the local date
    pub fn with_today(self, today: NaiveDate) -> Self {
        Self {
            today: Some(today),
            ..self
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl AnalyticsProvider for MockAnalytics {
    fn risk_distribution(&self) -> Vec<DistributionSlice> {
        vec![
            DistributionSlice::new("Low", 45, "#10b981"),
            DistributionSlice::new("Medium", 30, "#f59e0b"),
            DistributionSlice::new("High", 18, "#f97316"),
            DistributionSlice::new("Critical", 7, "#ef4444"),
        ]
    }

    fn breach_distribution(&self) -> Vec<DistributionSlice> {
        vec![
            DistributionSlice::new("Data Exfiltration", 12, "#ef4444"),
            DistributionSlice::new("Unauthorized Access", 9, "#f97316"),
            DistributionSlice::new("Policy Violation", 15, "#f59e0b"),
            DistributionSlice::new("Credential Sharing", 6, "#8b5cf6"),
            DistributionSlice::new("Suspicious Download", 8, "#3b82f6"),
        ]
    }

    fn user_weekly_activity(&self) -> Vec<UserWeeklyActivity> {
        let row = |user: &str, days: [u32; 7]| UserWeeklyActivity {
            user: user.to_string(),
            monday: days[0],
            tuesday: days[1],
            wednesday: days[2],
            thursday: days[3],
            friday: days[4],
            saturday: days[5],
            sunday: days[6],
        };
        vec![
            row("alice.martin", [24, 31, 28, 35, 22, 4, 1]),
            row("bob.chen", [18, 20, 26, 19, 30, 0, 0]),
            row("carla.diaz", [40, 38, 45, 41, 36, 12, 6]),
            row("dev.patel", [9, 14, 11, 16, 8, 2, 0]),
            row("erin.obrien", [27, 25, 33, 29, 31, 7, 3]),
            row("farid.haddad", [15, 19, 17, 22, 14, 0, 5]),
        ]
    }

    fn timeline(&self, days: usize) -> Vec<TimelineDataPoint> {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let mut rng = self.rng();

        (0..days)
            .rev()
            .filter_map(|offset| today.checked_sub_days(Days::new(offset as u64)))
            .map(|date| {
                let low = rng.gen_range(0..=MAX_LOW);
                let medium = rng.gen_range(0..=MAX_MEDIUM);
                let high = rng.gen_range(0..=MAX_HIGH);
                let critical = rng.gen_range(0..=MAX_CRITICAL);
                TimelineDataPoint {
                    date: date.format("%Y-%m-%d").to_string(),
                    low,
                    medium,
                    high,
                    critical,
                    total: low + medium + high + critical,
                }
            })
            .collect()
    }
}
