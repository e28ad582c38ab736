//! Teleinfo recorder daemon
//!
//! Usage:
//!   teleinfo-recorder --config config/recorder.toml
//!   teleinfo-recorder --environment development --once

use anyhow::{Context, Result};
use clap::Parser;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;
use teleinfo_config::{CostSettings, LogFormat, ProcessorMode, RecorderSettings};
use teleinfo_recorder::{
    CostProcessor, FrameReader, JsonLinesHandler, Record, Recorder, RecorderError,
    SerialFrameReader, TracingHandler,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "teleinfo-recorder")]
#[command(about = "Records Teleinfo frames from an electricity meter")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = teleinfo_config::defaults::CONFIG_FILE)]
    config: PathBuf,

    /// Environment overrides to apply (e.g. development)
    #[arg(short, long)]
    environment: Option<String>,

    /// Record a single frame and exit
    #[arg(long)]
    once: bool,

    /// Log level, overrides the configured one
    #[arg(short, long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = RecorderSettings::load(Some(&args.config), args.environment.as_deref())
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    settings.expand_env_vars()?;

    init_logging(&settings, args.log_level.as_deref());

    info!("Starting Teleinfo recorder");
    info!("Configuration: {}", args.config.display());

    let reader = SerialFrameReader::open(&settings.reader.device)
        .with_context(|| format!("Failed to open {}", settings.reader.device.display()))?;
    let mut recorder = build_recorder(reader, &settings)?;

    info!(
        counter = recorder.name(),
        reader = recorder.reader().name(),
        handlers = ?recorder.handler_names(),
        mode = ?recorder.processor_mode(),
        "recorder ready"
    );

    let interval = Duration::from_millis(settings.reader.poll_interval_ms);
    loop {
        match run_cycle(&mut recorder, &settings) {
            Ok(record) => info!(fields = record.len(), "record written"),
            Err(RecorderError::Read(err)) if err.kind() == ErrorKind::UnexpectedEof => {
                info!("End of input reached");
                break;
            }
            Err(err) if err.is_checksum_error() || err.is_shape_error() => {
                warn!(error = %err, stage = %recorder.last_stage(), "frame skipped");
            }
            Err(err) => {
                error!(error = %err, stage = %recorder.last_stage(), "write cycle failed");
            }
        }

        if args.once {
            break;
        }
        std::thread::sleep(interval);
    }

    Ok(())
}

fn init_logging(settings: &RecorderSettings, level_override: Option<&str>) {
    let level = level_override.unwrap_or(&settings.global.log_level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match settings.global.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

fn build_recorder<R: FrameReader>(
    reader: R,
    settings: &RecorderSettings,
) -> Result<Recorder<R>> {
    let mut recorder =
        Recorder::new(reader).with_processor_mode(settings.counter.processor_mode);
    recorder.set_name(settings.counter.name.as_str())?;

    if let Some(path) = &settings.handlers.json_lines {
        let handler = JsonLinesHandler::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        recorder.push_handler(Box::new(handler));
    }
    // pushed last so it runs first
    if settings.handlers.tracing {
        recorder.push_handler(Box::new(TracingHandler::new(recorder.name().to_string())));
    }
    if recorder.handler_count() == 0 {
        warn!("No handler configured, records will be dropped");
    }

    if recorder.processor_mode() == ProcessorMode::Persistent {
        register_processors(&mut recorder, settings)?;
    }
    Ok(recorder)
}

/// Run one write cycle
fn run_cycle<R: FrameReader>(
    recorder: &mut Recorder<R>,
    settings: &RecorderSettings,
) -> Result<Record, RecorderError> {
    // drain mode consumes the processors, queue them for the next record
    if recorder.processor_mode() == ProcessorMode::DrainOnce && recorder.processor_count() == 0 {
        register_processors(recorder, settings)?;
    }
    recorder.write()
}

/// Queue the configured processors for the next write
fn register_processors<R: FrameReader>(
    recorder: &mut Recorder<R>,
    settings: &RecorderSettings,
) -> Result<(), RecorderError> {
    if let Some(cost) = &settings.cost {
        recorder.push_processor(cost.result_key.as_str(), cost_processor(cost))?;
    }
    Ok(())
}

fn cost_processor(settings: &CostSettings) -> CostProcessor {
    CostProcessor::new(
        settings.index_key.as_str(),
        settings.reference_index,
        settings.price_per_kwh_millis,
    )
}
