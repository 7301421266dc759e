use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dsplay_sdk::logging::{self, LoggingMode};
use dsplay_sdk::{
    CommandCapable, ControllerConfig, DiskstationController, DummyController, Mode, ResolveCapable,
};
use tracing::{info, warn};

pub mod codes;
pub mod host;

use host::Host;

/// Plays scanned library cards on a DiskStation
///
/// Each line of input is one scanned code: a `cmd:` command, a `mode:`
/// or `room:` card, a play token, or a library reference.
#[derive(Parser, Debug)]
#[command(name = "qrplay")]
#[command(about = "Drive DiskStation Audio and Video Station from scanned cards")]
#[command(version)]
pub struct Args {
    /// Configuration file (defaults to <config dir>/dsplay/config.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log calls instead of talking to the DiskStation
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Verbose logging with source locations
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Handle codes from a file, or from stdin
    Run {
        /// Read codes from this file instead of stdin
        #[arg(long)]
        debug_file: Option<PathBuf>,

        /// Skip warming up the library
        #[arg(long)]
        skip_load: bool,

        /// Where the last selected room is remembered
        #[arg(long, default_value = ".last-device")]
        last_device_file: PathBuf,

        /// Pause between codes read from a file, in milliseconds
        #[arg(long, default_value = "0")]
        delay_ms: u64,
    },
    /// Resolve library references and print them as JSON
    Resolve {
        /// References such as `dsvideo:movie_id=7`
        #[arg(required = true)]
        uris: Vec<String>,
    },
    /// List the devices of both modes
    Devices,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug)?;

    if args.dry_run {
        info!("dry run, no requests will be sent");
        return dispatch(&args, DummyController::default());
    }

    let config = ControllerConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    let mut controller = DiskstationController::from_config(&config).context("failed to create controller")?;

    if matches!(args.command, Commands::Devices) {
        return list_devices(&mut controller);
    }
    if let Err(e) = controller.sync_devices() {
        warn!(error = %e, "could not load devices");
    }
    dispatch(&args, controller)
}

fn init_logging(debug: bool) -> Result<()> {
    let initialized = if debug {
        logging::init_logging(LoggingMode::Debug)
    } else {
        logging::init_logging_from_env(LoggingMode::Development)
    };
    initialized.context("failed to initialize logging")
}

fn dispatch<C: CommandCapable + ResolveCapable>(args: &Args, controller: C) -> Result<()> {
    match &args.command {
        Commands::Run {
            debug_file,
            skip_load,
            last_device_file,
            delay_ms,
        } => {
            let mut host = Host::new(controller).with_last_device_file(last_device_file);
            host.restore_last_device();
            run(&mut host, debug_file.as_ref(), *skip_load, Duration::from_millis(*delay_ms))
        }
        Commands::Resolve { uris } => resolve(controller, uris),
        Commands::Devices => {
            println!("No devices in a dry run");
            Ok(())
        }
    }
}

fn run<C: CommandCapable + ResolveCapable>(
    host: &mut Host<C>,
    debug_file: Option<&PathBuf>,
    skip_load: bool,
    delay: Duration,
) -> Result<()> {
    if !skip_load {
        info!("loading library");
        host.controller_mut().load_library_if_needed()?;
    }

    match debug_file {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            let codes = codes::read_codes(BufReader::new(file))?;
            info!(count = codes.len(), "handling codes from file");
            for code in codes {
                host.handle_all([code]);
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            }
        }
        None => {
            info!("reading codes from stdin");
            for line in io::stdin().lock().lines() {
                let line = line.context("failed to read stdin")?;
                if let Some(code) = codes::clean(&line) {
                    host.handle_all([code]);
                }
            }
        }
    }
    Ok(())
}

fn resolve<C: ResolveCapable>(mut controller: C, uris: &[String]) -> Result<()> {
    for uri in uris {
        match controller.resolve_track(uri) {
            Ok(descriptor) => println!("{}", serde_json::to_string(&descriptor)?),
            Err(e) => warn!(uri = %uri, error = %e, "could not resolve"),
        }
    }
    Ok(())
}

fn list_devices(controller: &mut DiskstationController) -> Result<()> {
    for mode in Mode::ALL {
        if let Err(e) = controller.refresh_devices(mode) {
            warn!(mode = %mode, error = %e, "could not list devices");
            continue;
        }
        println!("{}:", mode);
        for device in controller.devices(mode) {
            println!("  {} ({}, {})", device.name, device.id, device.kind);
        }
    }
    Ok(())
}
