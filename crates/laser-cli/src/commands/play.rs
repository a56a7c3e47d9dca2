//! Live game against the target board.

use anyhow::Result;
use laser_core::{Config, PlayerName, SerialSource};

use crate::commands::game;
use crate::prompter::prompt_player_name;

pub fn run(config: &Config, player: Option<&str>) -> Result<()> {
    let player = match player {
        Some(name) => PlayerName::new(name)?,
        None => prompt_player_name()?,
    };

    game::run(SerialSource::from_config(&config.device), player, config)
}
