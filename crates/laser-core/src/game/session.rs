use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::debug;

use crate::game::{Event, PlayerName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum SessionStatus {
    #[default]
    #[strum(serialize = "stopped")]
    Idle,
    #[strum(serialize = "started")]
    Running,
}

/// Live state of the current player's game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub player: PlayerName,
    pub status: SessionStatus,
    pub score: u32,
    pub missed: u32,
}

impl SessionState {
    pub fn new(player: PlayerName) -> Self {
        Self {
            player,
            status: SessionStatus::Idle,
            score: 0,
            missed: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }
}

/// Final tally of one completed session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub player: String,
    pub score: u32,
    pub missed: u32,
}

/// Observable effect of feeding one event to the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Counters were reset and a session is running
    Started,
    /// Session ended; carries its final counters
    Stopped(SessionResult),
    Scored(u32),
    Missed(u32),
}

/// Game session state machine.
///
/// ```text
/// Idle    --Start--> Running   reset counters
/// Running --Start--> Running   reset counters, no result
/// Running --Stop-->  Idle      emit SessionResult
/// Running --Hit-->   Running   score += 1
/// Running --Miss-->  Running   missed += 1
/// Idle    --Stop/Hit/Miss-->   ignored
/// ```
pub struct SessionMachine {
    state: SessionState,
}

impl SessionMachine {
    pub fn new(player: PlayerName) -> Self {
        Self {
            state: SessionState::new(player),
        }
    }

    /// Apply one event, returning the transition it caused (if any)
    pub fn handle(&mut self, event: &Event) -> Option<Transition> {
        let state = &mut self.state;
        match (state.status, event) {
            (status, Event::Start) => {
                if status == SessionStatus::Running {
                    debug!(
                        "Restart while running, discarding {} hits / {} misses",
                        state.score, state.missed
                    );
                }
                state.status = SessionStatus::Running;
                state.score = 0;
                state.missed = 0;
                Some(Transition::Started)
            }
            (SessionStatus::Running, Event::Stop) => {
                state.status = SessionStatus::Idle;
                Some(Transition::Stopped(SessionResult {
                    player: state.player.as_str().to_owned(),
                    score: state.score,
                    missed: state.missed,
                }))
            }
            (SessionStatus::Running, Event::Hit) => {
                state.score = state.score.saturating_add(1);
                Some(Transition::Scored(state.score))
            }
            (SessionStatus::Running, Event::Miss) => {
                state.missed = state.missed.saturating_add(1);
                Some(Transition::Missed(state.missed))
            }
            (SessionStatus::Idle, Event::Stop | Event::Hit | Event::Miss) => {
                debug!("Ignoring {} while no game is running", event);
                None
            }
            (_, Event::Unrecognized(line)) => {
                debug!("Ignoring unrecognized line: {:?}", line);
                None
            }
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> SessionState {
        self.state.clone()
    }
}
