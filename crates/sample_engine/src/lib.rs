//! # Sample Engine
//!
//! Periodic sampling/aggregation core.
//!
//! Responsibilities:
//! - Buffer producer samples between ticks (`ValueBuffer`)
//! - Drive restartable per-sensor interval timers (`IntervalTimer`)
//! - Reduce each drained window through a pluggable function (`ReductionSlot`)
//! - Emit one `CollectorEvent` per tick (`FunctionSensor`)
//!
//! ## Example
//!
//! ```ignore
//! use sample_engine::{builtins, FunctionSensor, Scheduler};
//! use std::time::Duration;
//!
//! let scheduler = Scheduler::current()?;
//! let sensor = FunctionSensor::<i64, i64>::spawn_with(
//!     "request_count",
//!     Duration::from_millis(100),
//!     &scheduler,
//!     events_tx,
//!     builtins::sum(),
//! );
//!
//! // Producers push values between ticks
//! sensor.add_value(1);
//! sensor.add_value(2);
//! // The tick drains the window and emits the reduced value (3)
//! ```

mod buffer;
mod catalog;
mod mock;
mod reduction;
mod scheduler;
mod sensor;
mod timer;

// Re-exports
pub use buffer::ValueBuffer;
pub use catalog::{build_sensor, DynSensor, REDUCTION_NAMES};
pub use mock::MockProducer;
pub use reduction::{builtins, ReduceFailure, ReduceResult, ReductionSlot};
pub use scheduler::Scheduler;
pub use sensor::FunctionSensor;
pub use timer::{IntervalTimer, TickHandler};

// Re-export contracts types
pub use contracts::{
    CollectorEvent, MetricRecord, MetricValue, ReduceError, SampleValue, SensorFault, SensorId,
    ValueKind,
};
