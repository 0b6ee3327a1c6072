//! Pipeline orchestrator - coordinates sensors, producers and the
//! collector for a demo run.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};

use collector::create_collector;
use contracts::{CollectorBlueprint, CollectorEvent};
use observability::TickStatsAggregator;
use sample_engine::{build_sensor, MockProducer, Scheduler};

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The collector blueprint
    pub blueprint: CollectorBlueprint,

    /// Run duration (None = until the input side shuts down)
    pub duration: Option<Duration>,

    /// Maximum number of records to emit (None = unlimited)
    pub max_records: Option<u64>,

    /// Mock producer rate per sensor (samples/second)
    pub produce_hz: f64,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let scheduler = Scheduler::current()?;

        // Sensors feed the orchestrator, which forwards to the collector
        // while folding events into the run statistics.
        let capacity = blueprint.collector.channel_capacity;
        let (events_tx, mut events_rx) = mpsc::channel::<CollectorEvent>(capacity);
        let (collector_tx, collector_rx) = mpsc::channel::<CollectorEvent>(capacity);

        let active_sinks = blueprint.sinks.len();
        let collector = create_collector(blueprint.sinks.clone(), collector_rx)
            .context("Failed to create collector")?;
        let collector_handle = collector.spawn();

        // Build sensors and their mock producers
        let mut sensors = Vec::with_capacity(blueprint.sensors.len());
        let mut producers = Vec::with_capacity(blueprint.sensors.len());
        for spec in &blueprint.sensors {
            let sensor = build_sensor(spec, &scheduler, events_tx.clone())
                .with_context(|| format!("Failed to build sensor '{}'", spec.id))?;
            producers.push(MockProducer::start(
                &scheduler,
                Arc::clone(&sensor),
                self.config.produce_hz,
            ));
            sensors.push(sensor);
        }
        drop(events_tx);

        info!(
            sensors = sensors.len(),
            sinks = active_sinks,
            "Pipeline running"
        );

        let mut stats = TickStatsAggregator::new();
        let deadline = self
            .config
            .duration
            .map(|d| tokio::time::Instant::now() + d);

        loop {
            let event = match deadline {
                Some(deadline) => {
                    match tokio::time::timeout_at(deadline, events_rx.recv()).await {
                        Ok(event) => event,
                        Err(_) => {
                            info!("Run duration reached");
                            break;
                        }
                    }
                }
                None => events_rx.recv().await,
            };

            let Some(event) = event else {
                break;
            };
            stats.update(&event);

            if collector_tx.send(event).await.is_err() {
                warn!("Collector channel closed early");
                break;
            }

            if let Some(max) = self.config.max_records {
                if stats.total_records >= max {
                    info!(records = stats.total_records, "Record limit reached");
                    break;
                }
            }
        }

        // Tear down: producers first, then sensors, then the collector
        for producer in &producers {
            producer.stop();
        }
        drop(producers);
        drop(sensors);
        drop(collector_tx);

        if let Err(e) = collector_handle.await {
            warn!(error = ?e, "Collector task panicked");
        }

        Ok(PipelineStats {
            records_emitted: stats.total_records,
            faults_reported: stats.total_faults,
            duration: start_time.elapsed(),
            active_sensors: blueprint.sensors.len(),
            active_sinks,
            tick_stats: stats,
        })
    }
}
