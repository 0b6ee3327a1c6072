//! # Integration Tests
//!
//! Cross-crate end-to-end tests:
//! - sensor -> collector -> sink pipelines
//! - type-matrix coverage of all element/result combinations
//! - concurrency and isolation properties

#[cfg(test)]
mod support {
    use std::sync::{Arc, Mutex};

    use contracts::{CollectorError, CollectorEvent, CollectorSink, MetricRecord, SensorFault};

    /// Sink that captures every event for later assertions.
    pub struct CaptureSink {
        name: String,
        pub events: Arc<Mutex<Vec<CollectorEvent>>>,
    }

    impl CaptureSink {
        pub fn new(name: &str) -> (Self, Arc<Mutex<Vec<CollectorEvent>>>) {
            let events = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    name: name.to_string(),
                    events: Arc::clone(&events),
                },
                events,
            )
        }
    }

    impl CollectorSink for CaptureSink {
        fn name(&self) -> &str {
            &self.name
        }

        async fn emit(&mut self, record: &MetricRecord) -> Result<(), CollectorError> {
            self.events
                .lock()
                .unwrap()
                .push(CollectorEvent::Metric(record.clone()));
            Ok(())
        }

        async fn report(&mut self, fault: &SensorFault) -> Result<(), CollectorError> {
            self.events
                .lock()
                .unwrap()
                .push(CollectorEvent::Fault(fault.clone()));
            Ok(())
        }

        async fn flush(&mut self) -> Result<(), CollectorError> {
            Ok(())
        }

        async fn close(&mut self) -> Result<(), CollectorError> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use collector::{Collector, SinkHandle};
    use contracts::{CollectorEvent, FaultKind, SampleValue};
    use sample_engine::{builtins, FunctionSensor, Scheduler};
    use tokio::sync::mpsc;
    use tokio::time::sleep;

    use crate::support::CaptureSink;

    /// End-to-end: FunctionSensor -> Collector -> CaptureSink
    #[tokio::test(start_paused = true)]
    async fn sensor_output_reaches_sink() {
        let (sink, events) = CaptureSink::new("capture");
        let (tx, rx) = mpsc::channel(64);
        let collector = Collector::with_handles(vec![SinkHandle::spawn(sink, 64)], rx);
        let collector_handle = collector.spawn();

        let scheduler = Scheduler::current().unwrap();
        let sensor = FunctionSensor::<i64, i64>::spawn_with(
            "adds",
            Duration::from_millis(100),
            &scheduler,
            tx,
            builtins::sum(),
        );

        sensor.add_value(1);
        sensor.add_value(2);
        sensor.add_value(3);

        sleep(Duration::from_millis(150)).await;
        sensor.shutdown().await;
        collector_handle.await.unwrap();

        let events = events.lock().unwrap();
        match &events[0] {
            CollectorEvent::Metric(record) => {
                assert_eq!(record.sensor_id, "adds");
                assert_eq!(record.value, SampleValue::Int(6));
            }
            other => panic!("expected metric, got {other:?}"),
        }
    }

    /// Faults travel the same channel and reach the sink's error path.
    #[tokio::test(start_paused = true)]
    async fn fault_reaches_error_channel() {
        let (sink, events) = CaptureSink::new("capture");
        let (tx, rx) = mpsc::channel(64);
        let collector = Collector::with_handles(vec![SinkHandle::spawn(sink, 64)], rx);
        let collector_handle = collector.spawn();

        let scheduler = Scheduler::current().unwrap();
        let sensor = FunctionSensor::<i64, i64>::spawn(
            "unbound",
            Duration::from_millis(100),
            &scheduler,
            tx,
        );
        sensor.add_value(1);

        sleep(Duration::from_millis(150)).await;
        sensor.shutdown().await;
        collector_handle.await.unwrap();

        let events = events.lock().unwrap();
        match &events[0] {
            CollectorEvent::Fault(fault) => {
                assert_eq!(fault.kind, FaultKind::UnboundReduction);
            }
            other => panic!("expected fault, got {other:?}"),
        }
    }

    /// A pathologically slow reduction delays only its own sensor.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn slow_sensor_does_not_stall_siblings() {
        let (tx, mut rx) = mpsc::channel::<CollectorEvent>(256);

        let scheduler = Scheduler::current().unwrap();
        let slow = FunctionSensor::<i64, i64>::spawn_with(
            "slow",
            Duration::from_millis(50),
            &scheduler,
            tx.clone(),
            |values: &[i64]| {
                std::thread::sleep(Duration::from_millis(150));
                Ok(values.len() as i64)
            },
        );
        let fast = FunctionSensor::<i64, i64>::spawn_with(
            "fast",
            Duration::from_millis(50),
            &scheduler,
            tx,
            builtins::count(),
        );

        tokio::time::sleep(Duration::from_millis(600)).await;
        slow.shutdown().await;
        fast.shutdown().await;

        let mut fast_records = 0;
        while let Some(event) = rx.recv().await {
            if let CollectorEvent::Metric(record) = event {
                if record.sensor_id == "fast" {
                    fast_records += 1;
                }
            }
        }

        // ~12 windows elapsed; the slow sibling must not hold fast back
        assert!(
            fast_records >= 8,
            "fast sensor only emitted {fast_records} records"
        );
    }

    /// Values added concurrently with ticks are counted exactly once.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn no_sample_is_lost_or_double_counted() {
        const THREADS: usize = 4;
        const PER_THREAD: usize = 500;

        let (tx, mut rx) = mpsc::channel::<CollectorEvent>(1024);
        let scheduler = Scheduler::current().unwrap();
        let sensor = Arc::new(FunctionSensor::<i64, i64>::spawn_with(
            "counter",
            Duration::from_millis(20),
            &scheduler,
            tx,
            builtins::count(),
        ));

        let producers: Vec<_> = (0..THREADS)
            .map(|_| {
                let sensor = Arc::clone(&sensor);
                std::thread::spawn(move || {
                    for _ in 0..PER_THREAD {
                        sensor.add_value(1);
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        // Let the final window drain
        tokio::time::sleep(Duration::from_millis(100)).await;
        Arc::try_unwrap(sensor)
            .unwrap_or_else(|_| panic!("sensor still shared"))
            .shutdown()
            .await;

        let mut total = 0i64;
        while let Some(event) = rx.recv().await {
            if let CollectorEvent::Metric(record) = event {
                match record.value {
                    SampleValue::Int(count) => total += count,
                    other => panic!("unexpected value {other:?}"),
                }
            }
        }

        assert_eq!(total, (THREADS * PER_THREAD) as i64);
    }
}

#[cfg(test)]
mod type_matrix {
    use std::time::Duration;

    use contracts::{CollectorEvent, MetricValue};
    use sample_engine::{FunctionSensor, Scheduler};
    use tokio::sync::mpsc;

    /// Builds a result value from a window length, for each result kind.
    trait FromLen {
        fn from_len(n: usize) -> Self;
    }

    impl FromLen for i64 {
        fn from_len(n: usize) -> Self {
            n as i64
        }
    }

    impl FromLen for f64 {
        fn from_len(n: usize) -> Self {
            n as f64
        }
    }

    impl FromLen for bool {
        fn from_len(n: usize) -> Self {
            n % 2 == 0
        }
    }

    impl FromLen for String {
        fn from_len(n: usize) -> Self {
            n.to_string()
        }
    }

    async fn run_combo<T, U>(samples: Vec<U>)
    where
        T: MetricValue + FromLen + PartialEq + std::fmt::Debug,
        U: MetricValue,
    {
        let scheduler = Scheduler::current().unwrap();
        let (tx, mut rx) = mpsc::channel(4);
        let sensor = FunctionSensor::<T, U>::spawn_with(
            "combo",
            Duration::from_millis(100),
            &scheduler,
            tx,
            |values: &[U]| Ok(T::from_len(values.len())),
        );

        let expected = T::from_len(samples.len());
        for sample in samples {
            sensor.add_value(sample);
        }

        match rx.recv().await.unwrap() {
            CollectorEvent::Metric(record) => {
                assert_eq!(record.value.kind(), T::KIND);
                assert_eq!(record.value, expected.into_value());
            }
            other => panic!("expected metric, got {other:?}"),
        }

        sensor.shutdown().await;
    }

    fn ints() -> Vec<i64> {
        vec![1, 2]
    }
    fn doubles() -> Vec<f64> {
        vec![0.5, 1.5]
    }
    fn bools() -> Vec<bool> {
        vec![true, false]
    }
    fn texts() -> Vec<String> {
        vec!["a".into(), "b".into()]
    }

    /// All 16 element/result combinations behave identically modulo the
    /// type substitution.
    #[tokio::test(start_paused = true)]
    async fn all_sixteen_combinations_behave_uniformly() {
        run_combo::<i64, i64>(ints()).await;
        run_combo::<i64, f64>(doubles()).await;
        run_combo::<i64, bool>(bools()).await;
        run_combo::<i64, String>(texts()).await;

        run_combo::<f64, i64>(ints()).await;
        run_combo::<f64, f64>(doubles()).await;
        run_combo::<f64, bool>(bools()).await;
        run_combo::<f64, String>(texts()).await;

        run_combo::<bool, i64>(ints()).await;
        run_combo::<bool, f64>(doubles()).await;
        run_combo::<bool, bool>(bools()).await;
        run_combo::<bool, String>(texts()).await;

        run_combo::<String, i64>(ints()).await;
        run_combo::<String, f64>(doubles()).await;
        run_combo::<String, bool>(bools()).await;
        run_combo::<String, String>(texts()).await;
    }
}

#[cfg(test)]
mod config_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use sample_engine::{build_sensor, Scheduler};
    use tokio::sync::mpsc;

    const DEMO_CONFIG: &str = r#"
[collector]
name = "demo"

[[sensors]]
id = "request_count"
element = "int"
result = "int"
interval_ms = 100
reduction = "sum"

[[sensors]]
id = "latency_mean"
element = "double"
result = "double"
interval_ms = 250
reduction = "mean"

[[sensors]]
id = "error_seen"
element = "bool"
result = "bool"
interval_ms = 500
reduction = "any"

[[sinks]]
name = "log"
sink_type = "log"
"#;

    /// Every sensor a validated config declares can actually be built.
    #[tokio::test]
    async fn validated_config_builds_all_sensors() {
        let blueprint = ConfigLoader::load_from_str(DEMO_CONFIG, ConfigFormat::Toml).unwrap();
        let scheduler = Scheduler::current().unwrap();
        let (tx, _rx) = mpsc::channel(16);

        for spec in &blueprint.sensors {
            let sensor = build_sensor(spec, &scheduler, tx.clone()).unwrap();
            assert_eq!(sensor.id().as_str(), spec.id);
            assert_eq!(sensor.element_kind(), spec.element);
            assert_eq!(sensor.result_kind(), spec.result);
        }
    }

    #[test]
    fn invalid_config_is_rejected_before_build() {
        let bad = DEMO_CONFIG.replace("reduction = \"sum\"", "reduction = \"median\"");
        assert!(ConfigLoader::load_from_str(&bad, ConfigFormat::Toml).is_err());
    }
}
