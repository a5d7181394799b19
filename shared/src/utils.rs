// Serde helpers shared by the stream and historical wire formats.

/// Timestamps arrive either as epoch milliseconds or as RFC 3339 date strings.
/// Both are normalised to epoch milliseconds.
pub mod timestamp_millis {
    use chrono::DateTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Millis(i64),
        Fractional(f64),
        Text(String),
    }

    impl RawTimestamp {
        fn into_millis(self) -> Result<i64, String> {
            match self {
                RawTimestamp::Millis(ms) => Ok(ms),
                RawTimestamp::Fractional(ms) => fractional_millis(ms),
                RawTimestamp::Text(text) => parse_str(&text),
            }
        }
    }

    /// Truncates towards zero. Values outside the `i64` range are rejected
    /// instead of saturating.
    fn fractional_millis(ms: f64) -> Result<i64, String> {
        let truncated = ms.trunc();
        // -2^63 is exact as f64; 2^63 is the first value past i64::MAX.
        if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
            Ok(truncated as i64)
        } else {
            Err(format!("timestamp {} is out of range", ms))
        }
    }

    /// Parses a timestamp given as text: digits are epoch milliseconds,
    /// anything else must be an RFC 3339 date.
    pub fn parse_str(text: &str) -> Result<i64, String> {
        let trimmed = text.trim();
        if let Ok(ms) = trimmed.parse::<i64>() {
            return Ok(ms);
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| dt.timestamp_millis())
            .map_err(|e| format!("invalid timestamp '{}': {}", text, e))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawTimestamp::deserialize(deserializer)?
            .into_millis()
            .map_err(D::Error::custom)
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawTimestamp>::deserialize(deserializer)? {
            Some(raw) => raw.into_millis().map(Some).map_err(D::Error::custom),
            None => Ok(None),
        }
    }

}
