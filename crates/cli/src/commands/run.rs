//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};
use contracts::CollectorBlueprint;

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    // Load, parse and validate configuration
    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    info!(
        collector = %blueprint.collector.name,
        sensors = blueprint.sensors.len(),
        sinks = blueprint.sinks.len(),
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    // Build pipeline configuration
    let pipeline_config = PipelineConfig {
        blueprint,
        duration: if args.duration == 0 {
            None
        } else {
            Some(Duration::from_secs(args.duration))
        },
        max_records: if args.max_records == 0 {
            None
        } else {
            Some(args.max_records)
        },
        produce_hz: args.produce_hz,
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    let pipeline = Pipeline::new(pipeline_config);

    info!("Starting pipeline...");

    tokio::select! {
        result = pipeline.run() => {
            let stats = result
                .map_err(|e| CliError::pipeline_execution(e.to_string()))?;

            info!(
                records = stats.records_emitted,
                faults = stats.faults_reported,
                duration_secs = stats.duration.as_secs_f64(),
                "Pipeline completed"
            );
            stats.print_summary();
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, shutting down");
        }
    }

    Ok(())
}

fn print_config_summary(blueprint: &CollectorBlueprint) {
    println!("Collector: {}", blueprint.collector.name);
    println!("Sensors:");
    for sensor in &blueprint.sensors {
        println!(
            "  {} ({} -> {}, {} every {}ms)",
            sensor.id, sensor.element, sensor.result, sensor.reduction, sensor.interval_ms
        );
    }
    println!("Sinks:");
    for sink in &blueprint.sinks {
        println!("  {} ({:?})", sink.name, sink.sink_type);
    }
}
