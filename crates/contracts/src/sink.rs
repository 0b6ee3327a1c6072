//! CollectorSink trait - Collector output interface
//!
//! Defines the abstract interface for sinks.

use crate::{CollectorError, MetricRecord, SensorFault};

/// Metric output trait
///
/// All sink implementations must implement this trait. Delivery and
/// retry policy are the sink's own responsibility.
#[trait_variant::make(CollectorSink: Send)]
pub trait LocalCollectorSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one emitted record
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn emit(&mut self, record: &MetricRecord) -> Result<(), CollectorError>;

    /// Report a per-tick sensor fault (the error channel)
    async fn report(&mut self, fault: &SensorFault) -> Result<(), CollectorError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), CollectorError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), CollectorError>;
}
