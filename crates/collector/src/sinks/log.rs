//! LogSink - logs records and faults via tracing

use contracts::{CollectorError, CollectorSink, MetricRecord, SensorFault};
use tracing::{info, instrument, warn};

/// Sink that logs emitted values for debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl CollectorSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_emit",
        skip(self, record),
        fields(sink = %self.name, sensor_id = %record.sensor_id)
    )]
    async fn emit(&mut self, record: &MetricRecord) -> Result<(), CollectorError> {
        info!(
            sink = %self.name,
            sensor_id = %record.sensor_id,
            value = %record.value,
            timestamp = %record.timestamp,
            "MetricRecord received"
        );
        Ok(())
    }

    async fn report(&mut self, fault: &SensorFault) -> Result<(), CollectorError> {
        warn!(
            sink = %self.name,
            sensor_id = %fault.sensor_id,
            kind = ?fault.kind,
            message = %fault.message,
            "SensorFault reported"
        );
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), CollectorError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), CollectorError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
