//! Terminal rendering of the live game and the records table.

use laser_core::{Notification, PlayerName, RecordBook};
use owo_colors::OwoColorize;

/// Everything the presentation loop reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Game(Notification),
    ShowRecords,
}

impl From<Notification> for UiEvent {
    fn from(notification: Notification) -> Self {
        UiEvent::Game(notification)
    }
}

/// Live game view; only ever updated from notifications
pub struct ConsoleView {
    player: PlayerName,
    running: bool,
    score: u32,
    missed: u32,
}

impl ConsoleView {
    pub fn new(player: PlayerName) -> Self {
        Self {
            player,
            running: false,
            score: 0,
            missed: 0,
        }
    }

    pub fn header(&self) -> String {
        format!(
            "{} {}\n{}",
            "Player:".bold(),
            self.player.bright_green().bold(),
            self.status_line()
        )
    }

    /// Update from one notification and return the line to print
    pub fn apply(&mut self, notification: &Notification) -> String {
        match notification {
            Notification::StatusChanged(running) => {
                self.running = *running;
                if *running {
                    self.score = 0;
                    self.missed = 0;
                }
                self.status_line()
            }
            Notification::ScoreChanged(score) => {
                self.score = *score;
                format!("{} {}", "Targets hit:".bold(), self.score.green())
            }
            Notification::MissedChanged(missed) => {
                self.missed = *missed;
                format!("{} {}", "Targets missed:".bold(), self.missed.red())
            }
            Notification::SessionFinished(result, record) => format!(
                "Game over: {} hit, {} missed. {} now has {} hits and {} misses over {} games.",
                result.score,
                result.missed,
                result.player,
                record.total_score,
                record.total_missed,
                record.games_played
            ),
            Notification::ConnectionError(message) => {
                format!("{} {}", "Connection failed:".red().bold(), message)
            }
            Notification::StreamError(message) => {
                format!("{} {}", "Device disconnected:".red().bold(), message)
            }
            Notification::StoreError(message) => {
                format!("{} {}", "Warning:".yellow().bold(), message)
            }
        }
    }

    fn status_line(&self) -> String {
        let status = if self.running {
            "started".green().to_string()
        } else {
            "stopped".red().to_string()
        };
        format!("{} {}", "Game status:".bold(), status)
    }
}

/// Records table, best total score first
pub fn format_records_table(book: &RecordBook) -> String {
    if book.is_empty() {
        return "No records yet.".to_string();
    }

    let name_width = book
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Player".len());

    let mut output = format!(
        "{:<name_width$}  {:>11}  {:>6}  {:>5}\n",
        "Player", "Total Score", "Missed", "Games"
    );
    for (name, record) in book.ranked() {
        output.push_str(&format!(
            "{:<name_width$}  {:>11}  {:>6}  {:>5}\n",
            name, record.total_score, record.total_missed, record.games_played
        ));
    }
    output
}
