use shared::period::ParsePeriodError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown time period: {source}")]
    UnknownPeriod {
        #[from]
        source: ParsePeriodError,
    },

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Historical data format error: {0}")]
    HistoricalDataFormatError(String),

    #[error("Malformed stream message: {0}")]
    StreamMessage(String),

    #[error("Ingestion task failed: {0}")]
    IngestError(String),
}

impl EngineError {
    /// True for errors caused by a programming or configuration mistake, as
    /// opposed to bad input data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EngineError::ConfigError(_) | EngineError::UnknownPeriod { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::TimePeriod;

    #[test]
    fn test_unknown_period_converts() {
        let err: EngineError = "6h".parse::<TimePeriod>().unwrap_err().into();
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "Unknown time period: unknown time period '6h'");
    }

    #[test]
    fn test_stream_message_is_not_configuration() {
        let err = EngineError::StreamMessage("bad".to_string());
        assert!(!err.is_configuration());
    }
}
