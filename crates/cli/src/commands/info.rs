//! `info` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Reading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let json = config_loader::ConfigLoader::to_json(&blueprint)
            .context("Failed to serialize configuration")?;
        println!("{}", json);
        return Ok(());
    }

    println!("Configuration: {}", args.config.display());
    println!("  Version: {:?}", blueprint.version);
    println!("  Collector: {}", blueprint.collector.name);
    println!(
        "  Channel capacity: {}",
        blueprint.collector.channel_capacity
    );
    println!("  Sensors: {}", blueprint.sensors.len());
    println!("  Sinks: {}", blueprint.sinks.len());

    if args.sensors {
        println!("\nSensors:");
        for sensor in &blueprint.sensors {
            println!(
                "  {} - {} over {} -> {}, every {}ms",
                sensor.id, sensor.reduction, sensor.element, sensor.result, sensor.interval_ms
            );
        }
    }

    if args.sinks {
        println!("\nSinks:");
        for sink in &blueprint.sinks {
            println!(
                "  {} - {:?} (queue {})",
                sink.name, sink.sink_type, sink.queue_capacity
            );
            for (key, value) in &sink.params {
                println!("    {} = {}", key, value);
            }
        }
    }

    Ok(())
}
