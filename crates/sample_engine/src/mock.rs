//! Deterministic mock producers.
//!
//! Drive sensors with synthetic samples for demos and tests where no
//! real data source is wired up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use contracts::{SampleValue, ValueKind};
use tracing::debug;

use crate::catalog::DynSensor;
use crate::Scheduler;

/// Feeds a sensor with a synthetic sample stream at a fixed rate.
pub struct MockProducer {
    running: Arc<AtomicBool>,
}

impl MockProducer {
    /// Start producing onto `sensor` at `frequency_hz` samples/second.
    pub fn start(scheduler: &Scheduler, sensor: Arc<dyn DynSensor>, frequency_hz: f64) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        scheduler.spawn(async move {
            let period = Duration::from_secs_f64(1.0 / frequency_hz.max(0.001));
            let kind = sensor.element_kind();
            let mut seq: u64 = 0;

            debug!(sensor_id = %sensor.id(), frequency_hz, "mock producer started");

            while flag.load(Ordering::Relaxed) {
                tokio::time::sleep(period).await;
                seq += 1;
                sensor.add_sample(synthetic_value(kind, seq));
            }

            debug!(sensor_id = %sensor.id(), produced = seq, "mock producer stopped");
        });

        Self { running }
    }

    /// Stop producing; the generator task winds down after its current
    /// sleep.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

impl Drop for MockProducer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Deterministic per-kind sample pattern.
fn synthetic_value(kind: ValueKind, seq: u64) -> SampleValue {
    match kind {
        ValueKind::Int => SampleValue::Int((seq % 10) as i64),
        ValueKind::Double => SampleValue::Double((seq as f64 * 0.25).sin()),
        ValueKind::Bool => SampleValue::Bool(seq % 2 == 0),
        ValueKind::Text => SampleValue::Text(format!("sample-{seq}")),
    }
}
