//! CollectorBlueprint - Config Loader output
//!
//! Describes a complete collector setup: collector settings, sensor
//! definitions and output routing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ValueKind;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete collector configuration blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Collector settings
    #[serde(default)]
    pub collector: CollectorSettings,

    /// Sensor definitions
    pub sensors: Vec<SensorSpec>,

    /// Output routing configuration
    pub sinks: Vec<SinkConfig>,
}

/// Collector-wide settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorSettings {
    /// Collector name, used in logs and file-sink paths
    #[serde(default = "default_collector_name")]
    pub name: String,

    /// Capacity of the sensor -> collector ingestion channel
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            name: default_collector_name(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_collector_name() -> String {
    "pulse".to_string()
}

fn default_channel_capacity() -> usize {
    256
}

/// Configuration for one function sensor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorSpec {
    /// Unique identifier
    pub id: String,

    /// Element kind of buffered samples
    pub element: ValueKind,

    /// Result kind of the reduced output
    pub result: ValueKind,

    /// Timer period in milliseconds, must be > 0
    pub interval_ms: u64,

    /// Named built-in reduction (e.g. "sum", "mean", "count")
    pub reduction: String,
}

/// Built-in reduction names accepted in [`SensorSpec::reduction`].
pub const REDUCTION_NAMES: &[&str] = &[
    "sum", "mean", "count", "last", "min", "max", "any", "all", "concat",
];

/// Whether a (reduction, element, result) combination is supported.
///
/// This is the declared config surface; the engine's sensor catalog
/// instantiates exactly these combinations.
pub fn reduction_supported(reduction: &str, element: ValueKind, result: ValueKind) -> bool {
    use ValueKind::{Bool, Double, Int, Text};
    matches!(
        (reduction, element, result),
        ("sum", Int, Int)
            | ("sum", Double, Double)
            | ("mean", Int, Double)
            | ("mean", Double, Double)
            | ("count", _, Int)
            | ("last", Int, Int)
            | ("last", Double, Double)
            | ("last", Bool, Bool)
            | ("last", Text, Text)
            | ("min", Int, Int)
            | ("min", Double, Double)
            | ("max", Int, Int)
            | ("max", Double, Double)
            | ("any", Bool, Bool)
            | ("all", Bool, Bool)
            | ("concat", Text, Text)
    )
}

impl SensorSpec {
    /// Whether this spec names a supported reduction/kind combination.
    pub fn combination_supported(&self) -> bool {
        reduction_supported(&self.reduction, self.element, self.result)
    }
}

/// Configuration for one sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Unique sink name
    pub name: String,

    /// Sink implementation
    pub sink_type: SinkType,

    /// Per-sink worker queue capacity
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Sink-specific parameters (e.g. "path" for the file sink)
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_queue_capacity() -> usize {
    64
}

/// Sink implementation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    Log,
    File,
}
