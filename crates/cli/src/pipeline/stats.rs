//! Pipeline statistics.

use std::time::Duration;

use observability::TickStatsAggregator;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Total records emitted by sensors
    pub records_emitted: u64,

    /// Total faults reported by sensors
    pub faults_reported: u64,

    /// Total duration of the run
    pub duration: Duration,

    /// Number of sensors that were active
    pub active_sensors: usize,

    /// Number of sinks that received data
    pub active_sinks: usize,

    /// Per-event aggregates
    pub tick_stats: TickStatsAggregator,
}

impl PipelineStats {
    /// Records emitted per second
    pub fn records_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.records_emitted as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Pipeline Statistics ===");
        println!("Duration: {:.2}s", self.duration.as_secs_f64());
        println!("Records emitted: {}", self.records_emitted);
        println!("Faults reported: {}", self.faults_reported);
        println!("Records/sec: {:.2}", self.records_per_sec());
        println!("Active sensors: {}", self.active_sensors);
        println!("Active sinks: {}", self.active_sinks);
        println!();
        println!("{}", self.tick_stats.summary());
    }
}
