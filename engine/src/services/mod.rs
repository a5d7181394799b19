// Services driving the live buffer: stream ingestion and chart data reads
pub mod chart_service;

pub use chart_service::helpers::parse_stream_message;
pub use chart_service::ChartService;
