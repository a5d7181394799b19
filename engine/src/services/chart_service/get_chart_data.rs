// Handler reading the live tail at a period's granularity and assembling the chart series
use crate::chart::assemble;
use crate::data::live_buffer::LiveBuffer;
use shared::models::{ChartData, HistoricalPoint, ItemId};
use shared::TimePeriod;
use tokio::sync::RwLock;

pub async fn handle_get_chart_data(
    item_id: ItemId,
    period: TimePeriod,
    historical: &[HistoricalPoint],
    live_buffer: &RwLock<LiveBuffer>,
) -> ChartData {
    let timestep_ms = period.display_timestep_ms();
    let live = live_buffer.read().await.consolidated_points(item_id, timestep_ms);

    tracing::debug!(
        item_id,
        %period,
        timestep_ms,
        historical_points = historical.len(),
        live_buckets = live.len(),
        "Assembling chart data"
    );
    let data = assemble(historical, &live);
    if !data.has_data {
        tracing::debug!(item_id, %period, "No chart data to render");
    }
    data
}
