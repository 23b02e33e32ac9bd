//! vslctl - AudioBox VSL DSP control CLI
//!
//! Encodes control positions into DSP parameter reports, sends them to the
//! interface over HID, and decodes captured reports back into positions.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vsl_control::{ConfigError, ControlError, TransportError};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "vslctl")]
#[command(about = "AudioBox VSL DSP control - encode, send and decode parameter reports")]
#[command(version)]
#[command(long_about = "
vslctl drives the DSP parameters of PreSonus AudioBox VSL interfaces over
USB HID. Positions are normalized control values between 0.0 and 1.0.

Without --config the built-in AudioBox 22 VSL description is used.
Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Device config file (YAML, or JSON by extension)
    #[arg(short, long, global = true, env = "VSLCTL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List HID interfaces
    Enumerate {
        /// Vendor ID filter (hex 0x194f or decimal)
        #[arg(long, value_parser = commands::parse_hex_id)]
        vid: Option<u16>,
        /// Product ID filter (hex 0x0101 or decimal)
        #[arg(long, value_parser = commands::parse_hex_id)]
        pid: Option<u16>,
        /// Show every interface instead of the configured device only
        #[arg(long, conflicts_with_all = ["vid", "pid"])]
        all: bool,
    },

    /// Encode a position without touching the device
    Encode {
        /// Parameter name from the config
        parameter: String,
        /// Control position, 0.0 to 1.0
        #[arg(allow_negative_numbers = true)]
        position: f32,
    },

    /// Encode a position and send it to the device
    Set {
        /// Parameter name from the config
        parameter: String,
        /// Control position, 0.0 to 1.0
        #[arg(allow_negative_numbers = true)]
        position: f32,
    },

    /// Print the encoding of evenly spaced positions
    Sweep {
        /// Parameter name from the config
        parameter: String,
        /// Number of positions, endpoints included
        #[arg(short, long, default_value_t = 11)]
        steps: u16,
    },

    /// Decode a captured report (hex bytes)
    Decode {
        /// Report bytes, e.g. "06 01 1A 59 9F" or 06011a599f
        report: String,
    },

    /// Load and validate the config
    CheckConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("vslctl={log_level},vsl_control={log_level},vsl_hid_common={log_level}")
                    .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            std::process::exit(exit_code(&e));
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match &cli.command {
        Commands::Enumerate { vid, pid, all } => {
            commands::device::enumerate(config_path, *vid, *pid, *all, cli.json)
        }
        Commands::Encode {
            parameter,
            position,
        } => commands::encode::encode(config_path, parameter, *position, cli.json),
        Commands::Set {
            parameter,
            position,
        } => commands::device::set(config_path, parameter, *position, cli.json),
        Commands::Sweep { parameter, steps } => {
            commands::encode::sweep(config_path, parameter, *steps, cli.json)
        }
        Commands::Decode { report } => commands::encode::decode(config_path, report, cli.json),
        Commands::CheckConfig => commands::config::check(config_path, cli.json),
    }
}

/// 2: device not found, 3: unknown parameter, 4: bad input or config,
/// 5: device I/O failure, 1: anything else.
fn exit_code(e: &anyhow::Error) -> i32 {
    if let Some(err) = e.downcast_ref::<ControlError>() {
        return match err {
            ControlError::UnknownParameter(_) => 3,
            ControlError::Transport(t) => transport_exit_code(t),
        };
    }
    if let Some(err) = e.downcast_ref::<TransportError>() {
        return transport_exit_code(err);
    }
    if e.downcast_ref::<ConfigError>().is_some() || e.downcast_ref::<CliError>().is_some() {
        return 4;
    }
    1
}

fn transport_exit_code(e: &TransportError) -> i32 {
    match e {
        TransportError::DeviceNotFound { .. } => 2,
        _ => 5,
    }
}
