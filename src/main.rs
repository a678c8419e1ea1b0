//! # Padmouse
//!
//! Drive the mouse and keyboard from a gamepad.
//!
//! - Left stick moves the cursor, right stick scrolls
//! - Triggers click with rapid-trigger semantics: a click releases as soon as
//!   the trigger starts travelling back, not at a fixed point
//! - D-pad and face buttons send keys with keyboard-style auto-repeat
//!
//! # Examples
//!
//! Run with the built-in defaults:
//! ```bash
//! padmouse
//! ```
//!
//! Use a config file and see what would be sent without touching uinput:
//! ```bash
//! padmouse --config config/default.toml --dry-run
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use padmouse::config::{Config, LoggingConfig};
use padmouse::controller::gamepad::EvdevGamepad;
use padmouse::engine::{run, TickPipeline};
use padmouse::output::log_sink::LogSink;
use padmouse::output::uinput::UinputSink;
use padmouse::output::OutputSink;

/// File name prefix for daily log files.
const LOG_FILE_PREFIX: &str = "padmouse.log";

/// Gamepad to mouse and keyboard bridge
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long, env = "PADMOUSE_CONFIG")]
    config: Option<PathBuf>,

    /// Gamepad event device, overrides controller.device_path
    #[arg(short, long)]
    device: Option<String>,

    /// Log actions instead of injecting them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(device) = args.device {
        config.controller.device_path = device;
    }

    let _log_guard = init_logging(&config.logging)?;

    info!("Padmouse v{} starting...", env!("CARGO_PKG_VERSION"));
    match &args.config {
        Some(path) => info!("Configuration file: {}", path.display()),
        None => info!("No configuration file given, using defaults"),
    }
    info!("{} bindings loaded", config.bindings.len());

    let gamepad =
        EvdevGamepad::open(config.controller.device_path()).context("Failed to open gamepad")?;
    info!(
        "Gamepad: {} ({})",
        gamepad.name().unwrap_or("unnamed"),
        gamepad.device_path()
    );

    let output: Box<dyn OutputSink> = if args.dry_run {
        info!("Dry run: actions are logged, not injected");
        Box::new(LogSink::new())
    } else {
        Box::new(
            UinputSink::create(tokio::runtime::Handle::current())
                .context("Failed to create virtual input device")?,
        )
    };

    let mut pipeline = TickPipeline::new(&config, gamepad, output);

    info!("Press Ctrl+C to exit");
    let ticks = run(&mut pipeline, config.engine.tick_rate_hz, shutdown_signal()).await;
    info!("Total ticks: {}", ticks);

    Ok(())
}

/// Installs the global subscriber: stderr always, plus a daily log file when
/// `logging.directory` is set. `RUST_LOG` overrides the configured level.
///
/// The returned guard flushes the file writer when dropped.
fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Invalid log level")?;

    let (file_layer, guard) = if config.directory.is_empty() {
        (None, None)
    } else {
        let appender = tracing_appender::rolling::daily(&config.directory, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (
            Some(fmt::layer().with_writer(writer).with_ansi(false)),
            Some(guard),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down..."),
        Err(e) => {
            // Without a signal handler, run until the process is killed
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
