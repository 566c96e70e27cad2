pub mod accumulator;
pub mod statistics;
pub mod summary;

pub use accumulator::{statistics_from_rows, StatsAccumulator, StatsColumns};
pub use statistics::{ActivityStatistics, RiskDistribution, TimeDistribution};
pub use summary::{PanelValue, RiskLevel, StatPanel, StatsSummary};
