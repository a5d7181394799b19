// In-memory store of live price points, bounded per item
use shared::models::{ItemId, LivePoint};
use std::collections::{BTreeMap, HashMap, VecDeque};

pub const DEFAULT_MAX_POINTS_PER_ITEM: usize = 500;

/// Per-item live price points, kept in arrival order.
///
/// Each item holds at most `max_points_per_item` points; the oldest are dropped
/// first. Items appear on their first [`LiveBuffer::add_point`] and disappear
/// only when cleared. There is no expiry and no eviction across items, so the
/// owner clears buffers when the chart context changes.
#[derive(Debug, Clone)]
pub struct LiveBuffer {
    buffers: HashMap<ItemId, VecDeque<LivePoint>>,
    max_points_per_item: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct BucketSums {
    high_sum: f64,
    high_count: u32,
    low_sum: f64,
    low_count: u32,
}

impl BucketSums {
    fn add(&mut self, point: &LivePoint) {
        if let Some(high) = point.high {
            self.high_sum += high;
            self.high_count += 1;
        }
        if let Some(low) = point.low {
            self.low_sum += low;
            self.low_count += 1;
        }
    }

    fn mean(sum: f64, count: u32) -> Option<f64> {
        (count > 0).then(|| sum / f64::from(count))
    }

    fn into_point(self, bucket_start: i64) -> LivePoint {
        LivePoint::live(
            bucket_start,
            Self::mean(self.high_sum, self.high_count),
            Self::mean(self.low_sum, self.low_count),
        )
    }
}

impl LiveBuffer {
    /// A bound of zero is raised to one: the newest point is always retained.
    pub fn new(max_points_per_item: usize) -> Self {
        LiveBuffer {
            buffers: HashMap::new(),
            max_points_per_item: max_points_per_item.max(1),
        }
    }

    /// Appends `point` to the item's buffer, creating it if needed, then drops
    /// points from the front until the bound holds.
    pub fn add_point(&mut self, item_id: ItemId, point: LivePoint) {
        let max = self.max_points_per_item;
        let points = self
            .buffers
            .entry(item_id)
            .or_insert_with(|| VecDeque::with_capacity(max.min(64)));

        points.push_back(point);
        if points.len() > max {
            let excess = points.len() - max;
            points.drain(..excess);
            tracing::trace!(item_id, dropped = excess, "Trimmed live buffer");
        }
    }

    /// The most recently appended point for the item.
    ///
    /// This is the last point received, not the one with the greatest
    /// timestamp.
    pub fn live_tip(&self, item_id: ItemId) -> Option<&LivePoint> {
        self.buffers.get(&item_id).and_then(|points| points.back())
    }

    /// Averages the item's points into buckets of `timestep_ms` width.
    ///
    /// Each bucket starts at `floor(timestamp / timestep_ms) * timestep_ms`.
    /// High and low are averaged over their present values only, so a bucket
    /// without any high yields `None` rather than zero. Buckets come out in
    /// ascending order regardless of arrival order; every output point is live.
    pub fn consolidated_points(&self, item_id: ItemId, timestep_ms: i64) -> Vec<LivePoint> {
        let Some(points) = self.buffers.get(&item_id) else {
            return Vec::new();
        };
        if timestep_ms <= 0 {
            tracing::warn!(
                item_id,
                timestep_ms,
                "Refusing to consolidate with a non-positive timestep"
            );
            return Vec::new();
        }

        let mut buckets: BTreeMap<i64, BucketSums> = BTreeMap::new();
        for point in points {
            let Some(bucket_start) = floor_to_bucket(point.timestamp, timestep_ms) else {
                tracing::warn!(
                    item_id,
                    timestamp = point.timestamp,
                    timestep_ms,
                    "Skipping point whose bucket start is out of range"
                );
                continue;
            };
            buckets.entry(bucket_start).or_default().add(point);
        }

        buckets
            .into_iter()
            .map(|(bucket_start, sums)| sums.into_point(bucket_start))
            .collect()
    }

    /// The item's points in append order.
    pub fn points(&self, item_id: ItemId) -> impl Iterator<Item = &LivePoint> + '_ {
        self.buffers.get(&item_id).into_iter().flatten()
    }

    pub fn len(&self, item_id: ItemId) -> usize {
        self.buffers.get(&item_id).map_or(0, VecDeque::len)
    }

    /// True when no item holds any point.
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Items currently holding points, in ascending order.
    pub fn item_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.buffers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Removes the item's entry entirely.
    pub fn clear_buffer(&mut self, item_id: ItemId) {
        if self.buffers.remove(&item_id).is_some() {
            tracing::debug!(item_id, "Cleared live buffer");
        }
    }

    pub fn clear_all_buffers(&mut self) {
        let items = self.buffers.len();
        self.buffers.clear();
        tracing::debug!(items, "Cleared all live buffers");
    }
}

/// Floor of `timestamp` to a multiple of `timestep_ms`, or `None` when that
/// multiple does not fit in an `i64`. `timestep_ms` must be positive.
fn floor_to_bucket(timestamp: i64, timestep_ms: i64) -> Option<i64> {
    timestamp.checked_sub(timestamp.rem_euclid(timestep_ms))
}

impl Default for LiveBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POINTS_PER_ITEM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEM: ItemId = 4151;

    fn point(timestamp: i64, high: Option<f64>, low: Option<f64>) -> LivePoint {
        LivePoint::live(timestamp, high, low)
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let value = actual.expect("expected a value");
        assert!((value - expected).abs() < 1e-9, "{} != {}", value, expected);
    }

    #[test]
    fn test_buffer_is_bounded_to_most_recent_points() {
        let mut buffer = LiveBuffer::default();
        for i in 0..750 {
            buffer.add_point(ITEM, point(i * 1_000, Some(i as f64), None));
        }
        assert_eq!(buffer.len(ITEM), 500);
        let highs: Vec<f64> = buffer.points(ITEM).filter_map(|p| p.high).collect();
        let expected: Vec<f64> = (250..750).map(|i| i as f64).collect();
        assert_eq!(highs, expected);
    }

    #[test]
    fn test_buffer_below_bound_keeps_everything() {
        let mut buffer = LiveBuffer::new(10);
        for i in 0..7 {
            buffer.add_point(ITEM, point(i, Some(1.0), Some(1.0)));
        }
        assert_eq!(buffer.len(ITEM), 7);
    }

    #[test]
    fn test_zero_bound_still_keeps_newest() {
        let mut buffer = LiveBuffer::new(0);
        buffer.add_point(ITEM, point(1, Some(1.0), None));
        buffer.add_point(ITEM, point(2, Some(2.0), None));
        assert_eq!(buffer.len(ITEM), 1);
        assert_eq!(buffer.live_tip(ITEM).map(|p| p.timestamp), Some(2));
    }

    #[test]
    fn test_live_tip_is_last_appended() {
        let mut buffer = LiveBuffer::new(3);
        let last = point(5_000, Some(7.0), Some(6.0));
        buffer.add_point(ITEM, point(9_000, Some(1.0), None));
        buffer.add_point(ITEM, point(8_000, Some(2.0), None));
        buffer.add_point(ITEM, point(7_000, Some(3.0), None));
        buffer.add_point(ITEM, last);
        // Older timestamp, but received last.
        assert_eq!(buffer.live_tip(ITEM), Some(&last));
    }

    #[test]
    fn test_single_bucket_average() {
        let mut buffer = LiveBuffer::default();
        buffer.add_point(ITEM, point(0, Some(100.0), Some(90.0)));
        buffer.add_point(ITEM, point(30_000, None, Some(94.0)));
        buffer.add_point(ITEM, point(59_000, Some(110.0), None));

        let first = buffer.consolidated_points(ITEM, 60_000);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].timestamp, 0);
        assert_close(first[0].high, 105.0);
        assert_close(first[0].low, 92.0);
        assert!(first[0].is_live);

        let second = buffer.consolidated_points(ITEM, 60_000);
        assert_eq!(first, second);
        assert_eq!(buffer.len(ITEM), 3);
    }

    #[test]
    fn test_null_values_are_not_averaged_as_zero() {
        let mut buffer = LiveBuffer::default();
        buffer.add_point(ITEM, point(1_000, Some(10.0), None));
        buffer.add_point(ITEM, point(2_000, None, Some(20.0)));

        let consolidated = buffer.consolidated_points(ITEM, 60_000);
        assert_eq!(consolidated.len(), 1);
        assert_eq!(consolidated[0].high, Some(10.0));
        assert_eq!(consolidated[0].low, Some(20.0));
    }

    #[test]
    fn test_bucket_with_only_lows_has_no_high() {
        let mut buffer = LiveBuffer::default();
        buffer.add_point(ITEM, point(1_000, None, Some(20.0)));
        buffer.add_point(ITEM, point(2_000, None, None));

        let consolidated = buffer.consolidated_points(ITEM, 60_000);
        assert_eq!(consolidated[0].high, None);
        assert_eq!(consolidated[0].low, Some(20.0));
    }

    #[test]
    fn test_buckets_sorted_regardless_of_arrival() {
        let mut buffer = LiveBuffer::default();
        buffer.add_point(ITEM, point(185_000, Some(3.0), None));
        buffer.add_point(ITEM, point(5_000, Some(1.0), None));
        buffer.add_point(ITEM, point(65_000, Some(2.0), None));
        buffer.add_point(ITEM, point(70_000, Some(4.0), None));

        let consolidated = buffer.consolidated_points(ITEM, 60_000);
        let starts: Vec<i64> = consolidated.iter().map(|p| p.timestamp).collect();
        assert_eq!(starts, vec![0, 60_000, 180_000]);
        assert_close(consolidated[1].high, 3.0);
    }

    #[test]
    fn test_consolidation_width_does_not_mutate() {
        let mut buffer = LiveBuffer::default();
        for i in 0..10 {
            buffer.add_point(ITEM, point(i * 60_000, Some(10.0), Some(8.0)));
        }
        assert_eq!(buffer.consolidated_points(ITEM, 300_000).len(), 2);
        assert_eq!(buffer.consolidated_points(ITEM, 60_000).len(), 10);
        assert_eq!(buffer.len(ITEM), 10);
    }

    #[test]
    fn test_non_positive_timestep_yields_nothing() {
        let mut buffer = LiveBuffer::default();
        buffer.add_point(ITEM, point(1_000, Some(1.0), None));
        assert!(buffer.consolidated_points(ITEM, 0).is_empty());
        assert!(buffer.consolidated_points(ITEM, -60_000).is_empty());
    }

    #[test]
    fn test_negative_timestamps_floor_to_bucket() {
        assert_eq!(floor_to_bucket(-1, 60_000), Some(-60_000));
        assert_eq!(floor_to_bucket(-60_000, 60_000), Some(-60_000));
        assert_eq!(floor_to_bucket(119_999, 60_000), Some(60_000));
        assert_eq!(floor_to_bucket(i64::MIN, 1), Some(i64::MIN));
    }

    #[test]
    fn test_unrepresentable_bucket_is_skipped() {
        let mut buffer = LiveBuffer::default();
        buffer.add_point(ITEM, point(i64::MIN + 1, Some(1.0), None));
        buffer.add_point(ITEM, point(90_000_000, Some(5.0), Some(4.0)));

        let consolidated = buffer.consolidated_points(ITEM, 86_400_000);
        assert_eq!(consolidated.len(), 1);
        assert_eq!(consolidated[0].timestamp, 86_400_000);
        assert_eq!(consolidated[0].high, Some(5.0));
        assert_eq!(buffer.len(ITEM), 2);
    }

    #[test]
    fn test_unknown_item_is_empty() {
        let buffer = LiveBuffer::default();
        assert!(buffer.live_tip(ITEM).is_none());
        assert!(buffer.consolidated_points(ITEM, 60_000).is_empty());
        assert_eq!(buffer.len(ITEM), 0);
        assert_eq!(buffer.points(ITEM).count(), 0);
    }

    #[test]
    fn test_clear_buffer_forgets_item() {
        let mut buffer = LiveBuffer::default();
        buffer.add_point(ITEM, point(1_000, Some(1.0), None));
        buffer.add_point(2, point(1_000, Some(1.0), None));
        buffer.clear_buffer(ITEM);

        assert!(buffer.live_tip(ITEM).is_none());
        assert!(buffer.consolidated_points(ITEM, 60_000).is_empty());
        assert_eq!(buffer.item_ids(), vec![2]);
    }

    #[test]
    fn test_clear_all_buffers() {
        let mut buffer = LiveBuffer::default();
        for item in [3, 1, 2] {
            buffer.add_point(item, point(1_000, Some(1.0), None));
        }
        assert_eq!(buffer.item_ids(), vec![1, 2, 3]);

        buffer.clear_all_buffers();
        assert!(buffer.is_empty());
        for item in [1, 2, 3] {
            assert!(buffer.live_tip(item).is_none());
            assert!(buffer.consolidated_points(item, 60_000).is_empty());
        }
    }
}
