// engine/src/services/chart_service/mod.rs
// ChartService owns the live buffer of one chart view and dispatches to the
// ingestion and chart-data handlers in the sibling modules.

use crate::config::EngineSettings;
use crate::data::live_buffer::LiveBuffer;
use crate::error::EngineError;
use shared::models::{ChartData, HistoricalPoint, ItemId, LivePoint, PriceTick};
use shared::TimePeriod;
use std::sync::Arc;
use tokio::io::AsyncBufRead;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;

pub mod forward_stream_lines;
pub mod get_chart_data;
pub mod helpers;
pub mod ingest_ticks;

/// Owns the live buffer for a chart view.
///
/// Build one per view and drop it with the view; buffers do not outlive it.
pub struct ChartService {
    live_buffer: Arc<RwLock<LiveBuffer>>,
}

impl ChartService {
    pub fn new(live_buffer: Arc<RwLock<LiveBuffer>>) -> Self {
        ChartService { live_buffer }
    }

    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::new(Arc::new(RwLock::new(LiveBuffer::new(
            settings.max_points_per_item,
        ))))
    }

    pub fn live_buffer(&self) -> Arc<RwLock<LiveBuffer>> {
        self.live_buffer.clone()
    }

    /// Feeds every tick of `ticks` into the buffer until the stream ends.
    /// Returns the number of ticks ingested.
    pub async fn ingest_ticks<S>(&self, ticks: S) -> usize
    where
        S: Stream<Item = PriceTick> + Unpin,
    {
        ingest_ticks::handle_ingest_ticks(ticks, self.live_buffer.clone()).await
    }

    /// Runs ingestion over `receiver` on the tokio runtime. The task ends when
    /// every sender is dropped.
    pub fn spawn_ingest(&self, receiver: mpsc::Receiver<PriceTick>) -> JoinHandle<usize> {
        tracing::debug!("Spawning live tick ingestion task");
        tokio::spawn(ingest_ticks::handle_ingest_ticks(
            ReceiverStream::new(receiver),
            self.live_buffer.clone(),
        ))
    }

    /// Decodes newline-delimited stream messages from `reader` and feeds them
    /// to a spawned ingestion task. Undecodable lines are skipped. Returns the
    /// number of ticks ingested once the input is exhausted.
    pub async fn ingest_lines<R>(
        &self,
        reader: R,
        channel_capacity: usize,
    ) -> Result<usize, EngineError>
    where
        R: AsyncBufRead + Unpin,
    {
        let (sender, receiver) = mpsc::channel(channel_capacity.max(1));
        let ingest = self.spawn_ingest(receiver);
        forward_stream_lines::handle_forward_stream_lines(reader, sender).await?;
        ingest
            .await
            .map_err(|e| EngineError::IngestError(e.to_string()))
    }

    pub async fn add_tick(&self, tick: &PriceTick) {
        let mut buffer = self.live_buffer.write().await;
        buffer.add_point(tick.item_id, LivePoint::from(tick));
    }

    pub async fn live_tip(&self, item_id: ItemId) -> Option<LivePoint> {
        self.live_buffer.read().await.live_tip(item_id).copied()
    }

    pub async fn chart_data(
        &self,
        item_id: ItemId,
        period: TimePeriod,
        historical: &[HistoricalPoint],
    ) -> ChartData {
        get_chart_data::handle_get_chart_data(item_id, period, historical, &self.live_buffer).await
    }

    /// Like [`ChartService::chart_data`], for a period identifier such as `"7d"`.
    /// An unknown identifier is an error.
    pub async fn chart_data_for(
        &self,
        item_id: ItemId,
        period_id: &str,
        historical: &[HistoricalPoint],
    ) -> Result<ChartData, EngineError> {
        let period: TimePeriod = period_id.parse()?;
        Ok(self.chart_data(item_id, period, historical).await)
    }

    /// Drops the live points of an item, e.g. when the view switches to another
    /// item or period.
    pub async fn switch_context(&self, item_id: ItemId) {
        self.live_buffer.write().await.clear_buffer(item_id);
    }

    pub async fn reset(&self) {
        self.live_buffer.write().await.clear_all_buffers();
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::from_settings(&EngineSettings::default())
    }
}
