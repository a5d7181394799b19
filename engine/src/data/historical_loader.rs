// Loads a historical price series from disk, as JSON or CSV
use crate::error::EngineError;
use csv::ReaderBuilder;
use shared::models::HistoricalPoint;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Columns understood by the CSV reader; at least `timestamp` and one price
/// column must be present.
pub const CSV_COLUMNS: [&str; 6] = [
    "timestamp",
    "avgHighPrice",
    "avgLowPrice",
    "high",
    "low",
    "price",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoricalFormat {
    Json,
    Csv,
}

impl HistoricalFormat {
    /// Picks the format from the file extension; anything but `.csv` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => HistoricalFormat::Csv,
            _ => HistoricalFormat::Json,
        }
    }
}

pub struct HistoricalLoader;

impl HistoricalLoader {
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<HistoricalPoint>, EngineError> {
        let path = path.as_ref();
        let points = match HistoricalFormat::from_path(path) {
            HistoricalFormat::Csv => Self::load_csv(path)?,
            HistoricalFormat::Json => Self::load_json(path)?,
        };
        tracing::info!(path = %path.display(), count = points.len(), "Loaded historical series");
        Ok(points)
    }

    /// Reads a JSON array of points. A `{ "data": [...] }` envelope, as the
    /// timeseries endpoint returns it, is accepted too.
    pub fn load_json(path: &Path) -> Result<Vec<HistoricalPoint>, EngineError> {
        let file = File::open(path)?;
        let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Vec<HistoricalPoint>, EngineError> {
        let array = match value {
            array @ serde_json::Value::Array(_) => array,
            serde_json::Value::Object(mut map) => map.remove("data").ok_or_else(|| {
                EngineError::HistoricalDataFormatError(
                    "expected an array or an object with a 'data' array".to_string(),
                )
            })?,
            other => {
                return Err(EngineError::HistoricalDataFormatError(format!(
                    "expected an array of points, found {}",
                    json_kind(&other)
                )))
            }
        };
        Ok(serde_json::from_value(array)?)
    }

    /// Reads a comma-separated file with a header row. Empty cells are nulls.
    pub fn load_csv(path: &Path) -> Result<Vec<HistoricalPoint>, EngineError> {
        let file = File::open(path)?;
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        let headers = rdr.headers()?.clone();
        if !headers.iter().any(|h| h == "timestamp") {
            return Err(EngineError::HistoricalDataFormatError(
                "missing 'timestamp' column".to_string(),
            ));
        }
        if !headers.iter().any(|h| h != "timestamp" && CSV_COLUMNS.contains(&h)) {
            return Err(EngineError::HistoricalDataFormatError(format!(
                "no price column, expected one of {:?}",
                &CSV_COLUMNS[1..]
            )));
        }

        let mut points = Vec::new();
        for (idx, result) in rdr.deserialize::<HistoricalPoint>().enumerate() {
            let point = result.map_err(|e| {
                EngineError::HistoricalDataFormatError(format!(
                    "error reading CSV record at line {}: {}",
                    idx + 2,
                    e
                ))
            })?;
            points.push(point);
        }
        Ok(points)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
