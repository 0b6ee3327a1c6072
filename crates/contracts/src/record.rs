//! MetricRecord / SensorFault - FunctionSensor output
//!
//! One event flows from a sensor to the collector per tick: a record on
//! success, a fault on failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{SampleValue, SensorId};

/// One reduced value emitted by a sensor tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Originating sensor
    pub sensor_id: SensorId,

    /// Reduced output value
    pub value: SampleValue,

    /// Wall-clock emission time
    pub timestamp: DateTime<Utc>,
}

impl MetricRecord {
    /// Create a record stamped with the current wall-clock time.
    pub fn now(sensor_id: SensorId, value: SampleValue) -> Self {
        Self {
            sensor_id,
            value,
            timestamp: Utc::now(),
        }
    }
}

/// Classification of per-tick sensor failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// Tick fired before any reduction was bound
    UnboundReduction,
    /// The bound reduction returned an error
    Reduction,
    /// The backing scheduling context failed for this sensor
    Scheduling,
}

/// A per-tick failure, reported through the sink error channel.
///
/// Faults never terminate the sensor; the drained window is lost and the
/// next window is captured normally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorFault {
    /// Originating sensor
    pub sensor_id: SensorId,

    /// Failure class
    pub kind: FaultKind,

    /// Human-readable detail
    pub message: String,

    /// Wall-clock report time
    pub timestamp: DateTime<Utc>,
}

impl SensorFault {
    /// Create a fault stamped with the current wall-clock time.
    pub fn now(sensor_id: SensorId, kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            sensor_id,
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Event on the sensor -> collector ingestion channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CollectorEvent {
    Metric(MetricRecord),
    Fault(SensorFault),
}

impl CollectorEvent {
    /// Sensor that produced this event.
    pub fn sensor_id(&self) -> &SensorId {
        match self {
            CollectorEvent::Metric(record) => &record.sensor_id,
            CollectorEvent::Fault(fault) => &fault.sensor_id,
        }
    }
}
