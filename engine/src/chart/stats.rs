// Summary statistics over the mid prices of an assembled series
use shared::models::{ChartPoint, ChartStats, Trend};

/// Computes first/last/min/max mid price, the change between first and last,
/// and the trend.
///
/// `series` is expected filtered and sorted. Points without a mid price are
/// skipped. A single usable point or a zero first price yields a flat trend and
/// a zero percent change, never NaN or infinity.
pub fn compute_stats(series: &[ChartPoint]) -> Option<ChartStats> {
    let mut mids = series.iter().filter_map(|p| p.mid_price);
    let first_price = mids.next()?;

    let mut last_price = first_price;
    let mut min_price = first_price;
    let mut max_price = first_price;
    let mut count = 1usize;
    for mid in mids {
        last_price = mid;
        min_price = min_price.min(mid);
        max_price = max_price.max(mid);
        count += 1;
    }

    let change = last_price - first_price;
    let (change_percent, trend) = if count < 2 || first_price == 0.0 {
        (0.0, Trend::Flat)
    } else {
        (change / first_price * 100.0, trend_of(change))
    };

    Some(ChartStats {
        first_price,
        last_price,
        min_price,
        max_price,
        change,
        change_percent,
        trend,
    })
}

fn trend_of(change: f64) -> Trend {
    if change > 0.0 {
        Trend::Up
    } else if change < 0.0 {
        Trend::Down
    } else {
        Trend::Flat
    }
}
