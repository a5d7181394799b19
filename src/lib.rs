//! Grand Exchange price tracker core.
//!
//! Re-exports the workspace members so consumers can depend on a single crate:
//! [`shared`] holds the data models and the period policy, [`engine`] holds the
//! live price buffer, the chart data assembler and the stream ingestion service.

pub use engine;
pub use shared;

pub mod prelude {
    pub use engine::chart::assemble;
    pub use engine::config::EngineSettings;
    pub use engine::data::live_buffer::LiveBuffer;
    pub use engine::error::EngineError;
    pub use engine::services::ChartService;
    pub use shared::models::{
        ChartData, ChartPoint, ChartStats, HistoricalPoint, ItemId, LivePoint, PriceTick, Trend,
    };
    pub use shared::period::{PeriodConfig, TimePeriod};
}
