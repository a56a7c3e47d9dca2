use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use laser_core::Config;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod prompter;
mod view;

#[derive(Parser)]
#[command(name = "laser")]
#[command(version, about = "Laser target game host")]
struct Cli {
    #[arg(short, long, global = true, default_value = "laser.toml")]
    config: PathBuf,

    #[command(flatten)]
    overrides: ConfigOverrides,

    #[command(subcommand)]
    command: Command,
}

/// Command-line values that take precedence over the config file
#[derive(Args, Debug, Default)]
struct ConfigOverrides {
    /// Serial port of the target board (e.g. COM3, /dev/ttyACM0)
    #[arg(long, global = true)]
    port: Option<String>,

    #[arg(long, global = true)]
    baud: Option<u32>,

    /// Serial read timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Player records file
    #[arg(long, global = true)]
    records: Option<PathBuf>,
}

impl ConfigOverrides {
    fn apply(self, config: &mut Config) {
        if let Some(port) = self.port {
            config.device.port = port;
        }
        if let Some(baud) = self.baud {
            config.device.baud_rate = baud;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.device.read_timeout_ms = timeout_ms;
        }
        if let Some(records) = self.records {
            config.records.path = records;
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Play a game with the target board
    Play {
        /// Player name; prompted for when omitted
        #[arg(short, long)]
        player: Option<String>,
    },
    /// Feed a captured device log through the game pipeline
    Replay {
        file: PathBuf,

        #[arg(short, long)]
        player: String,

        /// Delay between lines in milliseconds (0 = as fast as possible)
        #[arg(long, default_value_t = 0)]
        interval_ms: u64,
    },
    /// Show player records
    Records,
    /// List serial ports
    Ports,
}

fn main() -> Result<()> {
    // Logs go to stderr so they don't interleave with the game view
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("laser=info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut config = load_config(&cli.config);
    cli.overrides.apply(&mut config);
    config.validate().context("invalid configuration")?;

    match cli.command {
        Command::Play { player } => commands::play::run(&config, player.as_deref()),
        Command::Replay {
            file,
            player,
            interval_ms,
        } => commands::replay::run(&config, &file, &player, interval_ms),
        Command::Records => commands::records::run(&config),
        Command::Ports => commands::ports::run(),
    }
}

fn load_config(path: &Path) -> Config {
    match Config::load(path) {
        Ok(c) => {
            info!("Loaded config from {:?}", path);
            c
        }
        Err(e) if e.is_not_found() => {
            debug!("No config file at {:?}, using defaults", path);
            Config::default()
        }
        Err(e) => {
            warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        }
    }
}
