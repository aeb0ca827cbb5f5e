mod config;

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{error, info, LevelFilter};
use rigol_scope::{plot_waveform, save_waveform, Endpoint, ScopeClient, ScopeError};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::{load_config, AppConfig};

/// Automation for Rigol DS1000Z series oscilloscopes
#[derive(Parser, Debug)]
#[command(name = "scope-ctl")]
#[command(about = "Automation for working with Rigol DS1000Z Series of oscilloscopes", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the instrument host
    #[arg(long)]
    host: Option<String>,

    /// Override the instrument port
    #[arg(long)]
    port: Option<u16>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Restore instrument to the default state
    Reset,
    /// Configure scope to measure the built-in 1 kHz calibration wave
    #[command(name = "default")]
    Calibration,
    /// Print the instrument identity
    Identify,
    /// Configure, arm a single shot and plot the captured waveform
    Capture {
        /// Save the capture as JSON into this directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::from(1);
        }
    };
    if let Some(host) = args.host {
        config.scope.host = host;
    }
    if let Some(port) = args.port {
        config.scope.port = port;
    }

    let log_level = args
        .log_level
        .unwrap_or_else(|| config.logging.log_level.clone());
    initialize_logging(&log_level);

    match run(&args.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("✗ {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Open a session, run one subcommand, close the session on every path
fn run(command: &Command, config: &AppConfig) -> Result<(), ScopeError> {
    let endpoint = Endpoint::new(config.scope.host.clone(), config.scope.port);
    info!("Connecting to {endpoint}");

    let mut scope = ScopeClient::open(&endpoint, config.scope.connection())?;
    let identity = scope.handshake()?;
    info!("Connected to {} {} ({})", identity.name, identity.model, identity.serial);

    match command {
        Command::Reset => {
            scope.reset()?;
            info!("✓ Instrument reset");
        }
        Command::Calibration => {
            scope.configure_acquisition(&config.acquisition)?;
            info!("✓ Configured for calibration signal");
        }
        Command::Identify => {
            println!("Name:              {}", identity.name);
            println!("Model:             {}", identity.model);
            println!("Serial number:     {}", identity.serial);
            println!("Software version:  {}", identity.software_version);
        }
        Command::Capture { output } => {
            scope.configure_acquisition(&config.acquisition)?;
            scope.set_single_shot()?;
            let waveform = scope.read_waveform_data()?;
            info!("✓ Captured {} samples", waveform.len());

            if let Err(e) = plot_waveform(
                &waveform,
                Some("CH1"),
                Some(config.output.plot_width),
                Some(config.output.plot_height),
            ) {
                error!("Could not plot waveform: {e}");
            }

            if let Some(dir) = output.as_ref().or(config.output.capture_dir.as_ref()) {
                let path = save_waveform(dir, &waveform, Some(&identity))?;
                info!("Capture written to {}", path.display());
            }
        }
    }

    scope.close()
}

/// Initialize logging with configurable level
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => {
            eprintln!("Warning: Invalid log level '{}', using 'info'", log_level);
            LevelFilter::Info
        }
    };

    env_logger::Builder::from_env(Env::default())
        .filter_level(level)
        .format_timestamp_millis()
        .init();
}
