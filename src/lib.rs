// Library interface for qualigraph
// This allows integration tests to access internal modules

pub mod alignment;
pub mod charts;
pub mod errors;
pub mod pipeline;
pub mod ranking;
pub mod session;
pub mod ui;

// Re-export commonly used types
pub use alignment::{AlignedSample, TelemetrySeries, align_telemetry};
pub use charts::{BarChartSpec, ChartSet, LineChartSpec, build_charts};
pub use errors::QualigraphError;
pub use pipeline::{QualiReport, RequestOptions};
pub use ranking::{RankingEntry, extract_ranking};
pub use session::{DriverResult, Lap, LapSampleProvider, RawSample, SessionDataSource, SessionHandle};
