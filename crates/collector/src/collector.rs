//! Collector - main loop for fan-out to sinks

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use contracts::{CollectorEvent, SinkConfig, SinkType};

use crate::error::CollectError;
use crate::handle::SinkHandle;
use crate::metrics::MetricsSnapshot;
use crate::sinks::{FileSink, LogSink};

/// Collector configuration
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Sink configurations
    pub sinks: Vec<SinkConfig>,
}

/// Builder for creating a Collector
pub struct CollectorBuilder {
    config: CollectorConfig,
    input_rx: mpsc::Receiver<CollectorEvent>,
}

impl CollectorBuilder {
    /// Create a new CollectorBuilder
    pub fn new(config: CollectorConfig, input_rx: mpsc::Receiver<CollectorEvent>) -> Self {
        Self { config, input_rx }
    }

    /// Build and start the collector
    #[instrument(name = "collector_builder_build", skip(self))]
    pub fn build(self) -> Result<Collector, CollectError> {
        let handles = Self::initialize_handles(&self.config)?;

        Ok(Collector {
            handles,
            input_rx: self.input_rx,
        })
    }

    #[instrument(
        name = "collector_initialize_handles",
        skip(config),
        fields(sink_count = config.sinks.len())
    )]
    fn initialize_handles(config: &CollectorConfig) -> Result<Vec<SinkHandle>, CollectError> {
        let mut handles = Vec::with_capacity(config.sinks.len());
        for sink_config in &config.sinks {
            handles.push(create_sink_handle(sink_config)?);
        }
        Ok(handles)
    }
}

/// Create a SinkHandle from configuration
#[instrument(
    name = "collector_create_sink_handle",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
fn create_sink_handle(config: &SinkConfig) -> Result<SinkHandle, CollectError> {
    match config.sink_type {
        SinkType::Log => {
            let sink = LogSink::new(&config.name);
            Ok(SinkHandle::spawn(sink, config.queue_capacity))
        }
        SinkType::File => {
            let sink = FileSink::from_params(&config.name, &config.params)
                .map_err(|e| CollectError::sink_creation(&config.name, e.to_string()))?;
            Ok(SinkHandle::spawn(sink, config.queue_capacity))
        }
    }
}

/// The main Collector that fans events out to sinks
pub struct Collector {
    handles: Vec<SinkHandle>,
    input_rx: mpsc::Receiver<CollectorEvent>,
}

impl Collector {
    /// Create a collector with custom sink handles (for testing)
    pub fn with_handles(handles: Vec<SinkHandle>, input_rx: mpsc::Receiver<CollectorEvent>) -> Self {
        Self { handles, input_rx }
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.handles
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Run the collector main loop
    ///
    /// Consumes events from the input channel and fans out to all sinks.
    /// Returns when the input channel is closed.
    #[instrument(name = "collector_run", skip(self))]
    pub async fn run(mut self) {
        info!(sinks = self.handles.len(), "Collector started");

        let mut event_count: u64 = 0;

        while let Some(event) = self.input_rx.recv().await {
            event_count += 1;
            self.dispatch_event(&event);

            if event_count.is_multiple_of(100) {
                debug!(events = event_count, "Collector progress");
            }
        }

        info!(
            events = event_count,
            "Collector input closed, shutting down"
        );

        Self::shutdown_handles(self.handles).await;

        info!("Collector shutdown complete");
    }

    /// Spawn the collector as a background task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    fn dispatch_event(&self, event: &CollectorEvent) {
        for handle in &self.handles {
            handle.try_send(event.clone());
        }
    }

    async fn shutdown_handles(handles: Vec<SinkHandle>) {
        for handle in handles {
            handle.shutdown().await;
        }
    }
}

/// Convenience function to create a collector from sink configs
#[instrument(name = "collector_create", skip(sink_configs, input_rx))]
pub fn create_collector(
    sink_configs: Vec<SinkConfig>,
    input_rx: mpsc::Receiver<CollectorEvent>,
) -> Result<Collector, CollectError> {
    let config = CollectorConfig {
        sinks: sink_configs,
    };
    CollectorBuilder::new(config, input_rx).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{MetricRecord, SampleValue};
    use std::collections::HashMap;

    fn event(i: i64) -> CollectorEvent {
        CollectorEvent::Metric(MetricRecord::now("s".into(), SampleValue::Int(i)))
    }

    #[tokio::test]
    async fn test_collector_fanout() {
        let (input_tx, input_rx) = mpsc::channel(10);

        // Create log sinks for testing
        let sink1 = LogSink::new("sink1");
        let sink2 = LogSink::new("sink2");

        let handles = vec![SinkHandle::spawn(sink1, 10), SinkHandle::spawn(sink2, 10)];

        let collector = Collector::with_handles(handles, input_rx);
        let handle = collector.spawn();

        // Send some events
        for i in 0..5 {
            input_tx.send(event(i)).await.unwrap();
        }

        // Close input channel
        drop(input_tx);

        // Wait for collector to finish
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_create_collector_from_config() {
        let (input_tx, input_rx) = mpsc::channel(10);

        let configs = vec![SinkConfig {
            name: "test_log".to_string(),
            sink_type: SinkType::Log,
            queue_capacity: 50,
            params: HashMap::new(),
        }];

        let collector = create_collector(configs, input_rx).unwrap();
        let handle = collector.spawn();

        input_tx.send(event(1)).await.unwrap();

        drop(input_tx);
        handle.await.unwrap();
    }
}
