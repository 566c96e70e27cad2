pub mod analytics;
pub mod errors;
pub mod preview;
pub mod readers;
pub mod stats;
pub mod types;
pub mod upload;
pub mod utils;

pub use analytics::{AnalyticsProvider, MockAnalytics, TimelineDataPoint};
pub use errors::{DashboardError, Result};
pub use preview::{render_preview, DEFAULT_PREVIEW_LIMIT};
pub use readers::{parse_async, parse_file, FileSource, ParserConfig, ParserConfigBuilder};
pub use stats::{ActivityStatistics, RiskLevel, StatsColumns, StatsSummary};
pub use types::RowRecord;
pub use upload::{UploadPhase, UploadState, UploadSurface};
