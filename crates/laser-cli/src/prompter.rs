//! Interactive player name entry

use std::io::{self, BufRead, Write};

use anyhow::{Result, bail};
use laser_core::PlayerName;

/// Ask for a player name on stdin until a non-empty one is entered.
///
/// Fails if stdin is closed before a name is given.
pub fn prompt_player_name() -> Result<PlayerName> {
    let stdin = io::stdin();
    read_player_name(stdin.lock(), io::stdout())
}

fn read_player_name<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<PlayerName> {
    loop {
        write!(output, "Enter player name: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("no player name entered");
        }
        match PlayerName::new(&line) {
            Ok(name) => return Ok(name),
            Err(_) => writeln!(output, "Please enter a name!")?,
        }
    }
}
