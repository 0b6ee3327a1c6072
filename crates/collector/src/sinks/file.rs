//! FileSink - appends records and faults as JSON lines

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, instrument};

use contracts::{CollectorError, CollectorSink, MetricRecord, SensorFault};

/// Configuration for FileSink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Output directory; one file is created per run
    pub base_path: PathBuf,
}

impl FileSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let base_path = params
            .get("path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./metrics-out"));

        Self { base_path }
    }
}

/// One JSON line in the output file.
#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum FileLine<'a> {
    Metric(&'a MetricRecord),
    Fault(&'a SensorFault),
}

/// Sink that appends events to a JSON-lines file
pub struct FileSink {
    name: String,
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileSink {
    /// Create a new FileSink writing into `config.base_path`
    pub fn new(name: impl Into<String>, config: FileSinkConfig) -> std::io::Result<Self> {
        let name = name.into();
        fs::create_dir_all(&config.base_path)?;

        let filename = format!("{}-{}.jsonl", name, Utc::now().format("%Y%m%dT%H%M%SZ"));
        let path = config.base_path.join(filename);
        let writer = BufWriter::new(File::create(&path)?);

        debug!(sink = %name, path = %path.display(), "FileSink opened");

        Ok(Self { name, path, writer })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        let config = FileSinkConfig::from_params(params);
        Self::new(name, config)
    }

    /// Path of the file this sink writes to
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn write_line(&mut self, line: &FileLine<'_>) -> Result<(), CollectorError> {
        serde_json::to_writer(&mut self.writer, line)
            .map_err(|e| CollectorError::sink_write(&self.name, e.to_string()))?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl CollectorSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_sink_emit",
        skip(self, record),
        fields(sink = %self.name, sensor_id = %record.sensor_id)
    )]
    async fn emit(&mut self, record: &MetricRecord) -> Result<(), CollectorError> {
        self.write_line(&FileLine::Metric(record))
    }

    async fn report(&mut self, fault: &SensorFault) -> Result<(), CollectorError> {
        self.write_line(&FileLine::Fault(fault))
    }

    async fn flush(&mut self) -> Result<(), CollectorError> {
        self.writer.flush()?;
        Ok(())
    }

    #[instrument(name = "file_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), CollectorError> {
        self.writer.flush()?;
        debug!(sink = %self.name, path = %self.path.display(), "FileSink closed");
        Ok(())
    }
}
