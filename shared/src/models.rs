use serde::{Deserialize, Serialize};

/// Grand Exchange item identifier.
pub type ItemId = u32;

/// A single observed price update for one item.
///
/// `high` and `low` are independently optional: `None` means no trade of that
/// kind was observed at this instant, which is not the same as a zero price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivePoint {
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub is_live: bool,
}

impl LivePoint {
    /// Creates a point tagged as coming from the real-time stream.
    pub fn live(timestamp: i64, high: Option<f64>, low: Option<f64>) -> Self {
        Self {
            timestamp,
            high,
            low,
            is_live: true,
        }
    }
}

/// One message from the price stream, already decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTick {
    pub item_id: ItemId,
    /// Epoch milliseconds on the wire, or an RFC 3339 date string.
    #[serde(deserialize_with = "crate::utils::timestamp_millis::deserialize")]
    pub timestamp: i64,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
}

impl From<&PriceTick> for LivePoint {
    fn from(tick: &PriceTick) -> Self {
        LivePoint::live(tick.timestamp, tick.high, tick.low)
    }
}

impl From<PriceTick> for LivePoint {
    fn from(tick: PriceTick) -> Self {
        LivePoint::from(&tick)
    }
}

/// A point of the historical price series, as served by the price history API.
///
/// The API uses two namings for the same data (`avgHighPrice`/`avgLowPrice` for
/// bucketed timeseries, `high`/`low` for raw ones) plus a single `price` for
/// some item kinds. Use [`HistoricalPoint::resolved_high`] and
/// [`HistoricalPoint::resolved_low`] rather than reading the fields directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPoint {
    #[serde(
        default,
        deserialize_with = "crate::utils::timestamp_millis::deserialize_option"
    )]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub avg_high_price: Option<f64>,
    #[serde(default)]
    pub avg_low_price: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl HistoricalPoint {
    /// Shorthand for a point carrying only a single `price`.
    pub fn priced(timestamp: i64, price: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            price: Some(price),
            ..Self::default()
        }
    }

    pub fn resolved_high(&self) -> Option<f64> {
        self.avg_high_price.or(self.high).or(self.price)
    }

    pub fn resolved_low(&self) -> Option<f64> {
        self.avg_low_price.or(self.low).or(self.price)
    }
}

/// A point of the merged series handed to the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub timestamp: i64,
    pub high_price: Option<f64>,
    pub low_price: Option<f64>,
    pub mid_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_live: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

/// Summary statistics over the mid prices of a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartStats {
    pub first_price: f64,
    pub last_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub series: Vec<ChartPoint>,
    pub stats: Option<ChartStats>,
    pub has_data: bool,
}

impl ChartData {
    pub fn empty() -> Self {
        Self {
            series: Vec::new(),
            stats: None,
            has_data: false,
        }
    }
}
