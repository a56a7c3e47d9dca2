//! Replay a captured device log as if it came from the board.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use laser_core::{Config, PacedSource, PlayerName, ReaderSource};

use crate::commands::game;

pub fn run(config: &Config, file: &Path, player: &str, interval_ms: u64) -> Result<()> {
    let player = PlayerName::new(player)?;
    let capture = File::open(file).with_context(|| format!("failed to open {:?}", file))?;
    let source = ReaderSource::new(file.display().to_string(), capture);

    if interval_ms == 0 {
        game::run(source, player, config)
    } else {
        let paced = PacedSource::new(source, Duration::from_millis(interval_ms));
        game::run(paced, player, config)
    }
}
