//! Display periods and the bucket width used to render each of them.
//!
//! The same width is used to consolidate the historical series and the live
//! tail, so the two line up on the chart. Changing a width changes the rendered
//! granularity of every chart for that period.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePeriod {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "12h")]
    TwelveHours,
    #[serde(rename = "24h")]
    OneDay,
    #[serde(rename = "3d")]
    ThreeDays,
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
    #[serde(rename = "90d")]
    NinetyDays,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "all")]
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodConfig {
    /// Bucket width in milliseconds.
    pub display_timestep_ms: i64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsePeriodError {
    #[error("unknown time period '{0}'")]
    Unknown(String),
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 9] = [
        TimePeriod::OneHour,
        TimePeriod::TwelveHours,
        TimePeriod::OneDay,
        TimePeriod::ThreeDays,
        TimePeriod::SevenDays,
        TimePeriod::ThirtyDays,
        TimePeriod::NinetyDays,
        TimePeriod::OneYear,
        TimePeriod::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimePeriod::OneHour => "1h",
            TimePeriod::TwelveHours => "12h",
            TimePeriod::OneDay => "24h",
            TimePeriod::ThreeDays => "3d",
            TimePeriod::SevenDays => "7d",
            TimePeriod::ThirtyDays => "30d",
            TimePeriod::NinetyDays => "90d",
            TimePeriod::OneYear => "1y",
            TimePeriod::All => "all",
        }
    }

    pub fn config(self) -> PeriodConfig {
        let display_timestep_ms = match self {
            TimePeriod::OneHour => MINUTE_MS,
            TimePeriod::TwelveHours => 2 * MINUTE_MS,
            TimePeriod::OneDay => 5 * MINUTE_MS,
            TimePeriod::ThreeDays => 15 * MINUTE_MS,
            TimePeriod::SevenDays => 30 * MINUTE_MS,
            TimePeriod::ThirtyDays => 2 * HOUR_MS,
            TimePeriod::NinetyDays => 6 * HOUR_MS,
            TimePeriod::OneYear | TimePeriod::All => DAY_MS,
        };
        PeriodConfig {
            display_timestep_ms,
        }
    }

    pub fn display_timestep_ms(self) -> i64 {
        self.config().display_timestep_ms
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimePeriod {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimePeriod::ALL
            .into_iter()
            .find(|period| period.as_str() == s)
            .ok_or_else(|| ParsePeriodError::Unknown(s.to_string()))
    }
}

/// Looks up the configuration for a period identifier such as `"7d"`.
///
/// Unknown identifiers are an error, never a fallback width.
pub fn period_config(id: &str) -> Result<PeriodConfig, ParsePeriodError> {
    id.parse::<TimePeriod>().map(TimePeriod::config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestep_table() {
        let expected = [
            ("1h", 60_000),
            ("12h", 120_000),
            ("24h", 300_000),
            ("3d", 900_000),
            ("7d", 1_800_000),
            ("30d", 7_200_000),
            ("90d", 21_600_000),
            ("1y", 86_400_000),
            ("all", 86_400_000),
        ];
        for (id, step) in expected {
            assert_eq!(period_config(id).unwrap().display_timestep_ms, step, "period {}", id);
        }
        assert_eq!(expected.len(), TimePeriod::ALL.len());
    }

    #[test]
    fn test_unknown_period_is_rejected() {
        assert_eq!(
            period_config("2h"),
            Err(ParsePeriodError::Unknown("2h".to_string()))
        );
        assert!("".parse::<TimePeriod>().is_err());
        assert!("1H".parse::<TimePeriod>().is_err());
    }

    #[test]
    fn test_identifier_round_trip() {
        for period in TimePeriod::ALL {
            assert_eq!(period.to_string().parse::<TimePeriod>(), Ok(period));
        }
    }

    #[test]
    fn test_serde_uses_identifiers() {
        assert_eq!(serde_json::to_string(&TimePeriod::OneDay).unwrap(), r#""24h""#);
        let parsed: TimePeriod = serde_json::from_str(r#""90d""#).unwrap();
        assert_eq!(parsed, TimePeriod::NinetyDays);
        assert!(serde_json::from_str::<TimePeriod>(r#""5m""#).is_err());
    }
}
