//! snmpx - Main Application Entry Point
//!
//! SNMP v2c trap to chat webhook relay

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use futures_util::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use snmpx::snmp_listener::DEFAULT_MAX_PACKET_SIZE;
use snmpx::{Config, SnmpListener, TrapHandler, WebhookNotifier};

fn cli() -> Command {
    Command::new("snmpx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Relays SNMP v2c traps to chat webhooks, routed by severity")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/etc/snmpx.conf"),
        )
        .arg(
            Arg::new("listen")
                .short('l')
                .long("listen")
                .value_name("ADDR")
                .help("UDP address to receive traps on")
                .default_value("0.0.0.0:162"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)")
                .default_value("info"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .help("Also write logs to this file"),
        )
        .arg(
            Arg::new("log-rotation")
                .long("log-rotation")
                .value_name("STRATEGY")
                .help("Log file rotation")
                .value_parser(["daily", "hourly", "never"])
                .default_value("daily"),
        )
        .arg(
            Arg::new("daemon")
                .short('d')
                .long("daemon")
                .help("Run as daemon (suppress console output)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max-packet-size")
                .long("max-packet-size")
                .value_name("BYTES")
                .help("Largest UDP datagram accepted")
                .value_parser(value_parser!(usize))
                .default_value("8192"),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    initialise_logging(&matches)?;

    let config_path = PathBuf::from(string_arg(&matches, "config")?);
    info!("Starting snmpx v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load_from_file(&config_path).await.map_err(|e| {
        error!("Error loading config: {}", e);
        anyhow::Error::new(e).context("Failed to load configuration")
    })?;
    info!("Configuration loaded from: {}", config_path.display());

    run_application(config, &matches).await
}

fn string_arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("Missing value for --{}", name))
}

/// Initialise logging from command line flags
fn initialise_logging(matches: &ArgMatches) -> Result<()> {
    let level = match string_arg(matches, "log-level")? {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };
    let daemon_mode = matches.get_flag("daemon");

    let mut layers = Vec::new();

    if !daemon_mode {
        let console_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true);
        layers.push(console_layer.boxed());
    }

    if let Some(log_file) = matches.get_one::<String>("log-file") {
        let log_path = std::path::Path::new(log_file);
        let log_dir = log_path.parent().unwrap_or(std::path::Path::new("."));
        let log_filename = log_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("snmpx.log");

        std::fs::create_dir_all(log_dir).context("Failed to create log directory")?;

        let file_appender = match string_arg(matches, "log-rotation")? {
            "hourly" => tracing_appender::rolling::hourly(log_dir, log_filename),
            "never" => tracing_appender::rolling::never(log_dir, log_filename),
            _ => tracing_appender::rolling::daily(log_dir, log_filename),
        };

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .with_target(false);
        layers.push(file_layer.boxed());

        // Dropping the guard would stop the background writer.
        static GUARD_HOLDER: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
            std::sync::OnceLock::new();
        let _ = GUARD_HOLDER.set(guard);
    }

    if layers.is_empty() {
        // Daemon mode without a log file still reports to stderr.
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false);
        layers.push(stderr_layer.boxed());
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();

    Ok(())
}

/// Main application runtime
async fn run_application(config: Config, matches: &ArgMatches) -> Result<()> {
    let listen_addr = string_arg(matches, "listen")?;
    let max_packet_size = matches
        .get_one::<usize>("max-packet-size")
        .copied()
        .unwrap_or(DEFAULT_MAX_PACKET_SIZE);

    let (trap_tx, trap_rx) = mpsc::unbounded_channel();

    let listener = SnmpListener::bind(
        listen_addr,
        config.community.clone(),
        max_packet_size,
        trap_tx,
    )
    .await
    .context("Error starting SNMP trap listener")?;

    let notifier = WebhookNotifier::new().context("Failed to create HTTP client")?;
    let webhook_count = config.webhooks.len();
    if webhook_count == 0 {
        warn!("No webhooks configured - every trap will be dropped");
    }
    let handler = Arc::new(TrapHandler::new(config, notifier));

    let mut listener_handle = tokio::spawn(async move {
        if let Err(e) = listener.run().await {
            error!("SNMP listener failed: {:#}", e);
        }
    });
    let mut handler_handle = tokio::spawn(handler.run(trap_rx));

    let mut signals =
        Signals::new([SIGTERM, SIGINT]).context("Failed to register signal handlers")?;
    let signals_handle = signals.handle();

    info!("snmpx is listening for SNMP traps on UDP {}", listen_addr);
    info!("Routing to {} webhook(s)", webhook_count);

    tokio::select! {
        _ = signals.next() => {
            info!("Received shutdown signal, stopping");
        }
        _ = &mut listener_handle => {
            warn!("SNMP listener stopped unexpectedly");
        }
        _ = &mut handler_handle => {
            warn!("Trap handler stopped unexpectedly");
        }
    }

    signals_handle.close();
    listener_handle.abort();
    handler_handle.abort();

    info!("snmpx stopped");
    Ok(())
}
