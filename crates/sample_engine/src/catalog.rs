//! Spec-driven sensor construction over the closed kind set.
//!
//! Maps a `SensorSpec` (element kind, result kind, named reduction) to a
//! concrete `FunctionSensor` instantiation behind the type-erased
//! [`DynSensor`] surface. The supported combinations are declared by
//! `contracts::reduction_supported`.

use std::sync::Arc;
use std::time::Duration;

use contracts::{
    CollectorError, CollectorEvent, MetricValue, SampleValue, SensorId, SensorSpec, ValueKind,
};
use tokio::sync::mpsc;

use crate::reduction::builtins;
use crate::{FunctionSensor, Scheduler};

/// Non-owning, type-erased view of a running sensor.
///
/// Handles stay valid for the sensor's lifetime only; the sensor itself
/// keeps exclusive ownership of its buffer and timer.
pub trait DynSensor: Send + Sync {
    /// Sensor identifier.
    fn id(&self) -> &SensorId;

    /// Kind of buffered samples.
    fn element_kind(&self) -> ValueKind;

    /// Kind of the reduced output.
    fn result_kind(&self) -> ValueKind;

    /// Buffer a sample; returns false (sample rejected) on a kind
    /// mismatch instead of coercing.
    fn add_sample(&self, value: SampleValue) -> bool;

    /// Current timer period.
    fn interval(&self) -> Duration;

    /// Update the period; next tick fires one new interval from now.
    fn restart_timer(&self, interval: Duration);
}

impl<T: MetricValue, U: MetricValue> DynSensor for FunctionSensor<T, U> {
    fn id(&self) -> &SensorId {
        FunctionSensor::id(self)
    }

    fn element_kind(&self) -> ValueKind {
        U::KIND
    }

    fn result_kind(&self) -> ValueKind {
        T::KIND
    }

    fn add_sample(&self, value: SampleValue) -> bool {
        match U::from_value(value) {
            Some(value) => {
                self.add_value(value);
                true
            }
            None => false,
        }
    }

    fn interval(&self) -> Duration {
        FunctionSensor::interval(self)
    }

    fn restart_timer(&self, interval: Duration) {
        FunctionSensor::restart_timer(self, interval);
    }
}

/// Re-export of the accepted reduction names (config surface).
pub use contracts::REDUCTION_NAMES;

/// Build and start a sensor from its spec.
///
/// # Errors
/// `ConfigValidation` when the reduction/kind combination is not
/// supported.
pub fn build_sensor(
    spec: &SensorSpec,
    scheduler: &Scheduler,
    events: mpsc::Sender<CollectorEvent>,
) -> Result<Arc<dyn DynSensor>, CollectorError> {
    use ValueKind::{Bool, Double, Int, Text};

    let id: SensorId = spec.id.as_str().into();
    let interval = Duration::from_millis(spec.interval_ms);

    macro_rules! sensor {
        ($t:ty, $u:ty, $reduction:expr) => {
            Arc::new(FunctionSensor::<$t, $u>::spawn_with(
                id, interval, scheduler, events, $reduction,
            )) as Arc<dyn DynSensor>
        };
    }

    let sensor = match (spec.reduction.as_str(), spec.element, spec.result) {
        ("sum", Int, Int) => sensor!(i64, i64, builtins::sum()),
        ("sum", Double, Double) => sensor!(f64, f64, builtins::sum()),

        ("mean", Int, Double) => sensor!(f64, i64, builtins::mean_int()),
        ("mean", Double, Double) => sensor!(f64, f64, builtins::mean()),

        ("count", Int, Int) => sensor!(i64, i64, builtins::count()),
        ("count", Double, Int) => sensor!(i64, f64, builtins::count()),
        ("count", Bool, Int) => sensor!(i64, bool, builtins::count()),
        ("count", Text, Int) => sensor!(i64, String, builtins::count()),

        ("last", Int, Int) => sensor!(i64, i64, builtins::last()),
        ("last", Double, Double) => sensor!(f64, f64, builtins::last()),
        ("last", Bool, Bool) => sensor!(bool, bool, builtins::last()),
        ("last", Text, Text) => sensor!(String, String, builtins::last()),

        ("min", Int, Int) => sensor!(i64, i64, builtins::min()),
        ("min", Double, Double) => sensor!(f64, f64, builtins::min()),
        ("max", Int, Int) => sensor!(i64, i64, builtins::max()),
        ("max", Double, Double) => sensor!(f64, f64, builtins::max()),

        ("any", Bool, Bool) => sensor!(bool, bool, builtins::any()),
        ("all", Bool, Bool) => sensor!(bool, bool, builtins::all()),

        ("concat", Text, Text) => sensor!(String, String, builtins::concat(",")),

        (reduction, element, result) => {
            return Err(CollectorError::config_validation(
                format!("sensors[id={}]", spec.id),
                format!(
                    "unsupported combination: reduction '{reduction}' over {element} -> {result}"
                ),
            ))
        }
    };

    Ok(sensor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(reduction: &str, element: ValueKind, result: ValueKind) -> SensorSpec {
        SensorSpec {
            id: format!("{reduction}_{element}_{result}"),
            element,
            result,
            interval_ms: 100,
            reduction: reduction.to_string(),
        }
    }

    #[tokio::test]
    async fn builds_every_declared_combination() {
        let scheduler = Scheduler::current().unwrap();
        let (tx, _rx) = mpsc::channel(16);

        for &reduction in REDUCTION_NAMES {
            for element in [
                ValueKind::Int,
                ValueKind::Double,
                ValueKind::Bool,
                ValueKind::Text,
            ] {
                for result in [
                    ValueKind::Int,
                    ValueKind::Double,
                    ValueKind::Bool,
                    ValueKind::Text,
                ] {
                    let spec = spec(reduction, element, result);
                    let built = build_sensor(&spec, &scheduler, tx.clone());
                    assert_eq!(
                        built.is_ok(),
                        spec.combination_supported(),
                        "catalog and declared matrix disagree on {reduction}/{element}/{result}"
                    );
                }
            }
        }
    }

    #[tokio::test]
    async fn erased_sensor_rejects_mismatched_kinds() {
        let scheduler = Scheduler::current().unwrap();
        let (tx, _rx) = mpsc::channel(16);

        let sensor =
            build_sensor(&spec("sum", ValueKind::Int, ValueKind::Int), &scheduler, tx).unwrap();
        assert_eq!(sensor.element_kind(), ValueKind::Int);
        assert_eq!(sensor.result_kind(), ValueKind::Int);

        assert!(sensor.add_sample(SampleValue::Int(1)));
        assert!(!sensor.add_sample(SampleValue::Text("1".into())));
    }

    #[tokio::test]
    async fn unsupported_combination_is_a_validation_error() {
        let scheduler = Scheduler::current().unwrap();
        let (tx, _rx) = mpsc::channel(16);

        let err = match build_sensor(
            &spec("any", ValueKind::Int, ValueKind::Bool),
            &scheduler,
            tx,
        ) {
            Ok(_) => panic!("expected a validation error"),
            Err(err) => err,
        };
        assert!(matches!(err, CollectorError::ConfigValidation { .. }));
    }
}
