//! Configuration validation
//!
//! Validation rules:
//! - sensor ids unique and non-empty
//! - interval_ms > 0
//! - reduction name known and supported for the declared kinds
//! - sink names unique, queue_capacity > 0
//! - channel_capacity > 0

use std::collections::HashSet;

use contracts::{CollectorBlueprint, CollectorError, REDUCTION_NAMES};

/// Validate a CollectorBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &CollectorBlueprint) -> Result<(), CollectorError> {
    validate_collector_settings(blueprint)?;
    validate_sensor_ids(blueprint)?;
    validate_sensor_intervals(blueprint)?;
    validate_reductions(blueprint)?;
    validate_sinks(blueprint)?;
    Ok(())
}

fn validate_collector_settings(blueprint: &CollectorBlueprint) -> Result<(), CollectorError> {
    if blueprint.collector.channel_capacity == 0 {
        return Err(CollectorError::config_validation(
            "collector.channel_capacity",
            "channel_capacity must be > 0",
        ));
    }
    Ok(())
}

/// Validate sensor id uniqueness
fn validate_sensor_ids(blueprint: &CollectorBlueprint) -> Result<(), CollectorError> {
    let mut seen = HashSet::new();
    for sensor in &blueprint.sensors {
        if sensor.id.is_empty() {
            return Err(CollectorError::config_validation(
                "sensors[].id",
                "sensor id must not be empty",
            ));
        }
        if !seen.insert(&sensor.id) {
            return Err(CollectorError::config_validation(
                format!("sensors[id={}]", sensor.id),
                "duplicate sensor id",
            ));
        }
    }
    Ok(())
}

/// Validate timer periods
fn validate_sensor_intervals(blueprint: &CollectorBlueprint) -> Result<(), CollectorError> {
    for sensor in &blueprint.sensors {
        if sensor.interval_ms == 0 {
            return Err(CollectorError::config_validation(
                format!("sensors[id={}].interval_ms", sensor.id),
                "interval_ms must be > 0",
            ));
        }
    }
    Ok(())
}

/// Validate reduction names and kind combinations
fn validate_reductions(blueprint: &CollectorBlueprint) -> Result<(), CollectorError> {
    for sensor in &blueprint.sensors {
        if !REDUCTION_NAMES.contains(&sensor.reduction.as_str()) {
            return Err(CollectorError::config_validation(
                format!("sensors[id={}].reduction", sensor.id),
                format!(
                    "unknown reduction '{}', expected one of {:?}",
                    sensor.reduction, REDUCTION_NAMES
                ),
            ));
        }
        if !sensor.combination_supported() {
            return Err(CollectorError::config_validation(
                format!("sensors[id={}]", sensor.id),
                format!(
                    "reduction '{}' does not support {} -> {}",
                    sensor.reduction, sensor.element, sensor.result
                ),
            ));
        }
    }
    Ok(())
}

/// Validate sink configuration
fn validate_sinks(blueprint: &CollectorBlueprint) -> Result<(), CollectorError> {
    let mut seen = HashSet::new();
    for sink in &blueprint.sinks {
        if sink.name.is_empty() {
            return Err(CollectorError::config_validation(
                "sinks[].name",
                "sink name must not be empty",
            ));
        }
        if !seen.insert(&sink.name) {
            return Err(CollectorError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
        if sink.queue_capacity == 0 {
            return Err(CollectorError::config_validation(
                format!("sinks[name={}].queue_capacity", sink.name),
                "queue_capacity must be > 0",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{CollectorSettings, ConfigVersion, SensorSpec, SinkConfig, SinkType, ValueKind};
    use std::collections::HashMap;

    fn blueprint_with_sensors(sensors: Vec<SensorSpec>) -> CollectorBlueprint {
        CollectorBlueprint {
            version: ConfigVersion::V1,
            collector: CollectorSettings::default(),
            sensors,
            sinks: vec![SinkConfig {
                name: "log".to_string(),
                sink_type: SinkType::Log,
                queue_capacity: 64,
                params: HashMap::new(),
            }],
        }
    }

    fn sensor(id: &str) -> SensorSpec {
        SensorSpec {
            id: id.to_string(),
            element: ValueKind::Int,
            result: ValueKind::Int,
            interval_ms: 100,
            reduction: "sum".to_string(),
        }
    }

    #[test]
    fn accepts_valid_blueprint() {
        let bp = blueprint_with_sensors(vec![sensor("a"), sensor("b")]);
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn rejects_duplicate_sensor_id() {
        let bp = blueprint_with_sensors(vec![sensor("a"), sensor("a")]);
        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("duplicate sensor id"));
    }

    #[test]
    fn rejects_zero_interval() {
        let mut spec = sensor("a");
        spec.interval_ms = 0;
        let bp = blueprint_with_sensors(vec![spec]);
        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("interval_ms"));
    }

    #[test]
    fn rejects_unknown_reduction() {
        let mut spec = sensor("a");
        spec.reduction = "median".to_string();
        let bp = blueprint_with_sensors(vec![spec]);
        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("unknown reduction"));
    }

    #[test]
    fn rejects_unsupported_kind_combination() {
        let mut spec = sensor("a");
        spec.element = ValueKind::Bool;
        spec.result = ValueKind::Bool;
        // sum over bools is not a declared combination
        let bp = blueprint_with_sensors(vec![spec]);
        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("does not support"));
    }

    #[test]
    fn rejects_duplicate_sink_name() {
        let mut bp = blueprint_with_sensors(vec![sensor("a")]);
        bp.sinks.push(SinkConfig {
            name: "log".to_string(),
            sink_type: SinkType::File,
            queue_capacity: 64,
            params: HashMap::new(),
        });
        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("duplicate sink name"));
    }
}
