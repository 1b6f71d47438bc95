//! Configuration for plants and simulation runs.
//!
//! All values have defaults matching the reference plant (two plants, five
//! seconds, three oranges per bottle). A JSON file may override any subset.

use crate::core::StageTable;
use crate::errors::{PlantError, PlantResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// What happens to in-flight items when a plant stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrainPolicy {
    /// Stop every channel at once. Workers finish the item in hand and take
    /// what is already buffered, but forwarding into a stopped channel fails,
    /// so those items become waste.
    #[default]
    Discard,
    /// Stop only the first channel. Each worker stops its downstream channel
    /// after draining its own, so every accepted item reaches the end.
    Cascade,
}

impl fmt::Display for DrainPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discard => write!(f, "discard"),
            Self::Cascade => write!(f, "cascade"),
        }
    }
}

impl FromStr for DrainPolicy {
    type Err = PlantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "discard" => Ok(Self::Discard),
            "cascade" => Ok(Self::Cascade),
            other => Err(PlantError::invalid_config(
                "drain",
                format!("unknown drain policy '{other}', expected 'discard' or 'cascade'"),
            )),
        }
    }
}

/// Configuration for a single plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Per-stage processing cost.
    #[serde(default)]
    pub stages: StageTable,
    /// Oranges needed for one bottle of juice.
    #[serde(default = "default_items_per_bottle")]
    pub items_per_bottle: u64,
    /// Shutdown behavior for in-flight items.
    #[serde(default)]
    pub drain: DrainPolicy,
}

fn default_items_per_bottle() -> u64 {
    3
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            stages: StageTable::default(),
            items_per_bottle: default_items_per_bottle(),
            drain: DrainPolicy::default(),
        }
    }
}

impl PlantConfig {
    /// Creates a plant configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stage cost table.
    #[must_use]
    pub fn with_stages(mut self, stages: StageTable) -> Self {
        self.stages = stages;
        self
    }

    /// Sets the number of oranges per bottle.
    #[must_use]
    pub fn with_items_per_bottle(mut self, items_per_bottle: u64) -> Self {
        self.items_per_bottle = items_per_bottle;
        self
    }

    /// Sets the drain policy.
    #[must_use]
    pub fn with_drain(mut self, drain: DrainPolicy) -> Self {
        self.drain = drain;
        self
    }

    /// Checks that the configuration can drive a plant.
    pub fn validate(&self) -> PlantResult<()> {
        if self.items_per_bottle == 0 {
            return Err(PlantError::invalid_config(
                "items_per_bottle",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Configuration for a whole simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of independent plants.
    #[serde(default = "default_plants")]
    pub plants: usize,
    /// How long plants run before being stopped, in milliseconds.
    #[serde(default = "default_run_for_ms")]
    pub run_for_ms: u64,
    /// Settings shared by every plant.
    #[serde(default)]
    pub plant: PlantConfig,
}

fn default_plants() -> usize {
    2
}

fn default_run_for_ms() -> u64 {
    5 * 1000
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            plants: default_plants(),
            run_for_ms: default_run_for_ms(),
            plant: PlantConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Creates a simulation configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> PlantResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json_str(raw: &str) -> PlantResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the number of plants.
    #[must_use]
    pub fn with_plants(mut self, plants: usize) -> Self {
        self.plants = plants;
        self
    }

    /// Sets the run duration.
    #[must_use]
    pub fn with_run_for(mut self, run_for: Duration) -> Self {
        self.run_for_ms = u64::try_from(run_for.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the plant configuration.
    #[must_use]
    pub fn with_plant(mut self, plant: PlantConfig) -> Self {
        self.plant = plant;
        self
    }

    /// Gets the run duration as Duration.
    #[must_use]
    pub fn run_for(&self) -> Duration {
        Duration::from_millis(self.run_for_ms)
    }

    /// Checks every field.
    pub fn validate(&self) -> PlantResult<()> {
        if self.plants == 0 {
            return Err(PlantError::invalid_config("plants", "must be at least 1"));
        }
        if self.run_for_ms == 0 {
            return Err(PlantError::invalid_config("run_for_ms", "must be positive"));
        }
        self.plant.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Stage;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.plants, 2);
        assert_eq!(config.run_for(), Duration::from_secs(5));
        assert_eq!(config.plant.items_per_bottle, 3);
        assert_eq!(config.plant.drain, DrainPolicy::Discard);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = SimulationConfig::new()
            .with_plants(4)
            .with_run_for(Duration::from_millis(250))
            .with_plant(
                PlantConfig::new()
                    .with_stages(StageTable::uniform(1))
                    .with_items_per_bottle(2)
                    .with_drain(DrainPolicy::Cascade),
            );

        assert_eq!(config.plants, 4);
        assert_eq!(config.run_for_ms, 250);
        assert_eq!(config.plant.stages.cost_ms(Stage::Peeled), 1);
        assert_eq!(config.plant.drain, DrainPolicy::Cascade);
    }

    #[test]
    fn test_validation_rejects_zero_values() {
        assert!(SimulationConfig::new().with_plants(0).validate().is_err());
        assert!(SimulationConfig::new()
            .with_run_for(Duration::ZERO)
            .validate()
            .is_err());

        let err = PlantConfig::new().with_items_per_bottle(0).validate().unwrap_err();
        assert!(matches!(err, PlantError::InvalidConfig { ref field, .. } if field == "items_per_bottle"));
    }

    #[test]
    fn test_partial_json() {
        let config = SimulationConfig::from_json_str(
            r#"{"plants": 3, "plant": {"drain": "cascade", "stages": {"peeled_ms": 5}}}"#,
        )
        .unwrap();

        assert_eq!(config.plants, 3);
        assert_eq!(config.run_for_ms, 5000);
        assert_eq!(config.plant.drain, DrainPolicy::Cascade);
        assert_eq!(config.plant.stages.peeled_ms, 5);
        assert_eq!(config.plant.stages.squeezed_ms, 29);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let err = SimulationConfig::from_json_str(r#"{"plants": 0}"#).unwrap_err();
        assert!(matches!(err, PlantError::InvalidConfig { .. }));

        let err = SimulationConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, PlantError::Serialization(_)));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"run_for_ms": 120, "plant": {{"items_per_bottle": 4}}}}"#).unwrap();

        let config = SimulationConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.run_for_ms, 120);
        assert_eq!(config.plant.items_per_bottle, 4);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimulationConfig::from_json_file("/nonexistent/juiceflow.json").unwrap_err();
        assert!(matches!(err, PlantError::Io(_)));
    }

    #[test]
    fn test_drain_policy_parse() {
        assert_eq!("discard".parse::<DrainPolicy>().unwrap(), DrainPolicy::Discard);
        assert_eq!("Cascade".parse::<DrainPolicy>().unwrap(), DrainPolicy::Cascade);
        assert!("lossy".parse::<DrainPolicy>().is_err());
        assert_eq!(DrainPolicy::Cascade.to_string(), "cascade");
    }
}
