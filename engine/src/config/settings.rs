// Engine settings, loaded from a JSON file or defaulted
use crate::data::live_buffer::DEFAULT_MAX_POINTS_PER_ITEM;
use crate::error::EngineError;
use serde::Deserialize;
use shared::TimePeriod;
use std::path::Path;

/// Environment variable naming the settings file read by the binary.
pub const CONFIG_ENV_VAR: &str = "GE_TRACKER_CONFIG";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Upper bound on the live points kept per item.
    pub max_points_per_item: usize,
    /// Period used when the caller does not pick one.
    pub default_period: TimePeriod,
    /// Capacity of the channel between the stream reader and the ingest task.
    pub ingest_channel_capacity: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            max_points_per_item: DEFAULT_MAX_POINTS_PER_ITEM,
            default_period: TimePeriod::OneDay,
            ingest_channel_capacity: 64,
        }
    }
}

impl EngineSettings {
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&contents)?;
        tracing::debug!(path = %path.display(), ?settings, "Loaded engine settings");
        Ok(settings)
    }

    /// Loads from the file named by `GE_TRACKER_CONFIG`, or returns defaults
    /// when the variable is unset.
    pub fn from_env() -> Result<Self, EngineError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => {
                tracing::debug!("{} not set, using default engine settings", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_points_per_item == 0 {
            return Err(EngineError::ConfigError(
                "max_points_per_item must be greater than 0".to_string(),
            ));
        }
        if self.ingest_channel_capacity == 0 {
            return Err(EngineError::ConfigError(
                "ingest_channel_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
