//! FunctionSensor - buffer, timer and reduction composed into one
//! periodically-emitting metric source.

use std::sync::Arc;
use std::time::Duration;

use contracts::{
    CollectorEvent, FaultKind, MetricRecord, MetricValue, SensorFault, SensorId,
};
use tokio::sync::mpsc;
use tracing::warn;

use crate::buffer::ValueBuffer;
use crate::reduction::{ReduceFailure, ReduceResult, ReductionSlot};
use crate::timer::{IntervalTimer, TickHandler};
use crate::Scheduler;

/// A sensor that drains its sample window on every timer tick, reduces
/// it to one value and emits the result to the collector.
///
/// The sensor exclusively owns its timer; the buffer and reduction slot
/// are shared only with its own tick handler. Dropping the sensor stops
/// the timer, so no value can be added to, or emitted from, a dead
/// sensor.
pub struct FunctionSensor<T: MetricValue, U: MetricValue> {
    id: SensorId,
    buffer: Arc<ValueBuffer<U>>,
    reduction: Arc<ReductionSlot<T, U>>,
    timer: IntervalTimer,
}

/// Tick path: drain -> reduce -> emit. Lives inside the timer task.
struct SensorTick<T: MetricValue, U: MetricValue> {
    id: SensorId,
    buffer: Arc<ValueBuffer<U>>,
    reduction: Arc<ReductionSlot<T, U>>,
    events: mpsc::Sender<CollectorEvent>,
}

impl<T: MetricValue, U: MetricValue> TickHandler for SensorTick<T, U> {
    async fn on_tick(&mut self) {
        let window = self.buffer.drain_all();
        observability::record_tick(self.id.as_str(), window.len());

        // The reduction runs even for an empty window; defining a
        // sentinel result for that case is the function's contract.
        let event = match self.reduction.reduce(&window) {
            Ok(value) => {
                observability::record_emit(self.id.as_str());
                CollectorEvent::Metric(MetricRecord::now(self.id.clone(), value.into_value()))
            }
            Err(failure) => {
                let kind = match &failure {
                    ReduceFailure::Unbound => FaultKind::UnboundReduction,
                    ReduceFailure::Failed(_) => FaultKind::Reduction,
                };
                observability::record_fault(self.id.as_str(), kind);
                CollectorEvent::Fault(SensorFault::now(self.id.clone(), kind, failure.to_string()))
            }
        };

        if self.events.send(event).await.is_err() {
            warn!(sensor_id = %self.id, "collector channel closed, event dropped");
        }
    }
}

impl<T: MetricValue, U: MetricValue> FunctionSensor<T, U> {
    /// Create the sensor and start its timer on the given scheduler.
    ///
    /// The first tick fires one interval from now; bind a reduction
    /// before then or the tick reports an `UnboundReduction` fault.
    pub fn spawn(
        id: impl Into<SensorId>,
        interval: Duration,
        scheduler: &Scheduler,
        events: mpsc::Sender<CollectorEvent>,
    ) -> Self {
        let id = id.into();
        let buffer = Arc::new(ValueBuffer::new());
        let reduction = Arc::new(ReductionSlot::unbound());

        let tick = SensorTick {
            id: id.clone(),
            buffer: Arc::clone(&buffer),
            reduction: Arc::clone(&reduction),
            events,
        };
        let timer = IntervalTimer::spawn(scheduler, interval, tick);

        Self {
            id,
            buffer,
            reduction,
            timer,
        }
    }

    /// Create the sensor with an initial reduction already bound.
    pub fn spawn_with<F>(
        id: impl Into<SensorId>,
        interval: Duration,
        scheduler: &Scheduler,
        events: mpsc::Sender<CollectorEvent>,
        reduction: F,
    ) -> Self
    where
        F: Fn(&[U]) -> ReduceResult<T> + Send + Sync + 'static,
    {
        let sensor = Self::spawn(id, interval, scheduler, events);
        sensor.bind(reduction);
        sensor
    }

    /// Sensor identifier.
    pub fn id(&self) -> &SensorId {
        &self.id
    }

    /// Buffer a sample for the current window.
    ///
    /// Callable from any thread; never blocks past the buffer's push and
    /// never observes tick or sink errors.
    pub fn add_value(&self, value: U) {
        self.buffer.push(value);
    }

    /// Bind or replace the reduction (last write wins; a tick observes
    /// the old or the new function, never a mix).
    pub fn bind<F>(&self, reduction: F)
    where
        F: Fn(&[U]) -> ReduceResult<T> + Send + Sync + 'static,
    {
        self.reduction.bind(reduction);
    }

    /// Whether a reduction is currently bound.
    pub fn is_bound(&self) -> bool {
        self.reduction.is_bound()
    }

    /// Current timer period.
    pub fn interval(&self) -> Duration {
        self.timer.interval()
    }

    /// Update the period; the next tick fires one new interval from now.
    pub fn restart_timer(&self, interval: Duration) {
        self.timer.restart(interval);
    }

    /// Whether the timer is still delivering ticks.
    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Samples buffered since the last tick (diagnostics).
    pub fn pending_samples(&self) -> usize {
        self.buffer.len()
    }

    /// Stop the timer and wait for the tick task to finish.
    pub async fn shutdown(self) {
        self.timer.shutdown().await;
    }
}
