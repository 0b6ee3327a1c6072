//! # Collector
//!
//! Ingestion boundary for sensor output.
//!
//! Responsibilities:
//! - Consume `CollectorEvent`s from the sensor channel
//! - Fan out records and faults to all configured sinks
//! - Isolate slow sinks so they never block the main loop

pub mod collector;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod sinks;

pub use collector::{create_collector, Collector, CollectorBuilder, CollectorConfig};
pub use contracts::{CollectorEvent, CollectorSink, MetricRecord, SensorFault};
pub use error::CollectError;
pub use handle::SinkHandle;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{FileSink, LogSink};
