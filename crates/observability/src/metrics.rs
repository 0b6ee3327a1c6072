//! Collector metric recording and aggregation.
//!
//! Facade recording goes to the installed metrics exporter; the
//! aggregator keeps an in-memory view for end-of-run summaries.

use std::collections::HashMap;

use contracts::{CollectorEvent, FaultKind, SampleValue};
use metrics::{counter, histogram};

fn fault_label(kind: FaultKind) -> &'static str {
    match kind {
        FaultKind::UnboundReduction => "unbound_reduction",
        FaultKind::Reduction => "reduction",
        FaultKind::Scheduling => "scheduling",
    }
}

/// Record one timer tick and the size of its drained window.
pub fn record_tick(sensor_id: &str, window_len: usize) {
    counter!(
        "pulse_collector_ticks_total",
        "sensor_id" => sensor_id.to_string()
    )
    .increment(1);

    histogram!(
        "pulse_collector_window_samples",
        "sensor_id" => sensor_id.to_string()
    )
    .record(window_len as f64);
}

/// Record one successfully emitted metric record.
pub fn record_emit(sensor_id: &str) {
    counter!(
        "pulse_collector_records_total",
        "sensor_id" => sensor_id.to_string()
    )
    .increment(1);
}

/// Record one per-tick sensor fault.
pub fn record_fault(sensor_id: &str, kind: FaultKind) {
    counter!(
        "pulse_collector_faults_total",
        "sensor_id" => sensor_id.to_string(),
        "kind" => fault_label(kind)
    )
    .increment(1);
}

/// In-memory aggregation of collector events.
///
/// Updated once per event, summarized at the end of a run.
#[derive(Debug, Clone, Default)]
pub struct TickStatsAggregator {
    /// Total emitted records
    pub total_records: u64,

    /// Total reported faults
    pub total_faults: u64,

    /// Fault counts per kind label
    pub fault_counts: HashMap<&'static str, u64>,

    /// Emitted record counts per sensor
    pub per_sensor_records: HashMap<String, u64>,

    /// Running stats over numeric record values, per sensor
    pub numeric_stats: HashMap<String, RunningStats>,
}

impl TickStatsAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the aggregate.
    pub fn update(&mut self, event: &CollectorEvent) {
        match event {
            CollectorEvent::Metric(record) => {
                self.total_records += 1;
                *self
                    .per_sensor_records
                    .entry(record.sensor_id.to_string())
                    .or_insert(0) += 1;

                let numeric = match record.value {
                    SampleValue::Int(v) => Some(v as f64),
                    SampleValue::Double(v) => Some(v),
                    SampleValue::Bool(_) | SampleValue::Text(_) => None,
                };
                if let Some(value) = numeric {
                    self.numeric_stats
                        .entry(record.sensor_id.to_string())
                        .or_default()
                        .push(value);
                }
            }
            CollectorEvent::Fault(fault) => {
                self.total_faults += 1;
                *self.fault_counts.entry(fault_label(fault.kind)).or_insert(0) += 1;
            }
        }
    }

    /// Produce a summary report.
    pub fn summary(&self) -> CollectorSummary {
        let total_ticks = self.total_records + self.total_faults;
        CollectorSummary {
            total_records: self.total_records,
            total_faults: self.total_faults,
            fault_rate: if total_ticks > 0 {
                self.total_faults as f64 / total_ticks as f64 * 100.0
            } else {
                0.0
            },
            fault_counts: self.fault_counts.clone(),
            per_sensor_records: self.per_sensor_records.clone(),
            numeric: self
                .numeric_stats
                .iter()
                .map(|(id, stats)| (id.clone(), StatsSummary::from(stats)))
                .collect(),
        }
    }

    /// Reset all aggregates
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Summary of one collector run
#[derive(Debug, Clone, Default)]
pub struct CollectorSummary {
    pub total_records: u64,
    pub total_faults: u64,
    pub fault_rate: f64,
    pub fault_counts: HashMap<&'static str, u64>,
    pub per_sensor_records: HashMap<String, u64>,
    pub numeric: HashMap<String, StatsSummary>,
}

impl std::fmt::Display for CollectorSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Collector Summary ===")?;
        writeln!(f, "Records emitted: {}", self.total_records)?;
        writeln!(
            f,
            "Faults reported: {} ({:.2}%)",
            self.total_faults, self.fault_rate
        )?;

        if !self.fault_counts.is_empty() {
            writeln!(f, "Fault kinds:")?;
            for (kind, count) in &self.fault_counts {
                writeln!(f, "  {}: {}", kind, count)?;
            }
        }

        if !self.per_sensor_records.is_empty() {
            writeln!(f, "Records per sensor:")?;
            for (sensor, count) in &self.per_sensor_records {
                match self.numeric.get(sensor) {
                    Some(stats) => writeln!(f, "  {}: {} ({})", sensor, count, stats)?,
                    None => writeln!(f, "  {}: {}", sensor, count)?,
                }
            }
        }

        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a new value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Number of samples
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean value
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum value
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum value
    pub fn max(&self) -> f64 {
        self.max
    }
}
