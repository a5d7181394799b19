// Merges the historical series with the consolidated live tail
use super::stats::compute_stats;
use shared::models::{ChartData, ChartPoint, HistoricalPoint, LivePoint};

/// Builds the series handed to the chart, plus its statistics.
///
/// Historical points come first, then live points; the result is sorted by
/// timestamp with a stable sort, so a historical point stays ahead of a live
/// point with the same timestamp. Degenerate points are dropped: a zero or
/// missing timestamp, or a point whose high, low and mid are all missing or
/// zero.
pub fn assemble(historical: &[HistoricalPoint], live: &[LivePoint]) -> ChartData {
    let mut series: Vec<ChartPoint> = historical
        .iter()
        .filter_map(from_historical)
        .chain(live.iter().map(from_live))
        .filter(is_renderable)
        .collect();
    series.sort_by_key(|p| p.timestamp);

    let stats = compute_stats(&series);
    let has_data = !series.is_empty();
    tracing::trace!(
        historical = historical.len(),
        live = live.len(),
        kept = series.len(),
        "Assembled chart series"
    );

    ChartData {
        series,
        stats,
        has_data,
    }
}

/// `(high + low) / 2` when both are present, otherwise whichever one is.
pub fn mid_price(high: Option<f64>, low: Option<f64>) -> Option<f64> {
    match (high, low) {
        (Some(high), Some(low)) => Some((high + low) / 2.0),
        (Some(price), None) | (None, Some(price)) => Some(price),
        (None, None) => None,
    }
}

fn from_historical(point: &HistoricalPoint) -> Option<ChartPoint> {
    let timestamp = point.timestamp?;
    let high_price = point.resolved_high();
    let low_price = point.resolved_low();
    Some(ChartPoint {
        timestamp,
        high_price,
        low_price,
        mid_price: mid_price(high_price, low_price),
        is_live: None,
    })
}

fn from_live(point: &LivePoint) -> ChartPoint {
    ChartPoint {
        timestamp: point.timestamp,
        high_price: point.high,
        low_price: point.low,
        mid_price: mid_price(point.high, point.low),
        is_live: Some(point.is_live),
    }
}

fn is_renderable(point: &ChartPoint) -> bool {
    let has_price = |value: Option<f64>| value.is_some_and(|v| v != 0.0);
    point.timestamp != 0
        && (has_price(point.high_price) || has_price(point.low_price) || has_price(point.mid_price))
}
