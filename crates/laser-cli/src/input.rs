use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use laser_core::CancelToken;
use tracing::debug;

use crate::view::UiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Quit,
    ShowRecords,
}

/// Spawn a thread that watches the keyboard during a game.
///
/// - Esc, 'q', 'Q' or Ctrl+C cancel the game
/// - 'r' or 'R' asks the view to print the records table
///
/// The thread exits once `cancel` fires, from here or anywhere else.
pub fn spawn_keyboard_monitor(cancel: CancelToken, tx: Sender<UiEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        debug!("Keyboard monitor started");

        while !cancel.is_cancelled() {
            // Poll with a timeout so cancellation from elsewhere is noticed
            if event::poll(Duration::from_millis(100)).unwrap_or(false)
                && let Ok(Event::Key(key_event)) = event::read()
            {
                match key_action(&key_event) {
                    Some(KeyAction::Quit) => {
                        debug!("Quit key pressed: {:?}", key_event.code);
                        cancel.cancel();
                        break;
                    }
                    Some(KeyAction::ShowRecords) => {
                        let _ = tx.send(UiEvent::ShowRecords);
                    }
                    None => {}
                }
            }
        }

        debug!("Keyboard monitor stopped");
    })
}

fn key_action(event: &KeyEvent) -> Option<KeyAction> {
    match event.code {
        KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(KeyAction::Quit),
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Quit)
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Some(KeyAction::ShowRecords),
        _ => None,
    }
}
