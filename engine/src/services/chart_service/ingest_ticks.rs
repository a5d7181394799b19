// Handler feeding the live price stream into the buffer
use crate::data::live_buffer::LiveBuffer;
use shared::models::{LivePoint, PriceTick};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_stream::{Stream, StreamExt};

pub async fn handle_ingest_ticks<S>(mut ticks: S, live_buffer: Arc<RwLock<LiveBuffer>>) -> usize
where
    S: Stream<Item = PriceTick> + Unpin,
{
    let mut ingested = 0usize;
    while let Some(tick) = ticks.next().await {
        // One tick per lock so readers interleave with a busy stream.
        let mut buffer = live_buffer.write().await;
        buffer.add_point(tick.item_id, LivePoint::from(&tick));
        drop(buffer);

        ingested += 1;
        tracing::trace!(item_id = tick.item_id, timestamp = tick.timestamp, "Ingested live tick");
    }
    tracing::info!(count = ingested, "Live tick stream ended");
    ingested
}
