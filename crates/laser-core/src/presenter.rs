//! Presentation sink for live game updates.
//!
//! The ingestion thread calls a [`Presenter`] for every observable change.
//! [`ChannelPresenter`] forwards those calls as [`Notification`] values over
//! an mpsc channel so the presentation side never shares state with the
//! ingestion thread and is never waited on.

use std::sync::mpsc::Sender;

use crate::game::SessionResult;
use crate::record::PlayerRecord;

pub trait Presenter {
    /// Game started (`true`) or stopped (`false`). A start means the
    /// counters are back to zero.
    fn on_status_changed(&mut self, running: bool);

    fn on_score_changed(&mut self, score: u32);

    fn on_missed_changed(&mut self, missed: u32);

    /// The device could not be opened
    fn on_connection_error(&mut self, message: &str);

    /// The device failed after it was opened
    fn on_stream_error(&mut self, message: &str);

    /// Records could not be loaded or saved. Never fatal.
    fn on_store_error(&mut self, message: &str);

    /// A session ended and was folded into the player's record
    fn on_session_finished(&mut self, _result: &SessionResult, _record: &PlayerRecord) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    StatusChanged(bool),
    ScoreChanged(u32),
    MissedChanged(u32),
    ConnectionError(String),
    StreamError(String),
    StoreError(String),
    SessionFinished(SessionResult, PlayerRecord),
}

/// Presenter that dispatches every call over a channel.
///
/// `T` is the channel's message type, so callers can multiplex other events
/// (keyboard input, timers) with notifications on one receiver.
pub struct ChannelPresenter<T = Notification> {
    tx: Sender<T>,
}

impl<T: From<Notification>> ChannelPresenter<T> {
    pub fn new(tx: Sender<T>) -> Self {
        Self { tx }
    }

    fn send(&self, notification: Notification) {
        // Receiver gone means the UI is shutting down; nothing to report to.
        let _ = self.tx.send(T::from(notification));
    }
}

impl<T: From<Notification>> Presenter for ChannelPresenter<T> {
    fn on_status_changed(&mut self, running: bool) {
        self.send(Notification::StatusChanged(running));
    }

    fn on_score_changed(&mut self, score: u32) {
        self.send(Notification::ScoreChanged(score));
    }

    fn on_missed_changed(&mut self, missed: u32) {
        self.send(Notification::MissedChanged(missed));
    }

    fn on_connection_error(&mut self, message: &str) {
        self.send(Notification::ConnectionError(message.to_string()));
    }

    fn on_stream_error(&mut self, message: &str) {
        self.send(Notification::StreamError(message.to_string()));
    }

    fn on_store_error(&mut self, message: &str) {
        self.send(Notification::StoreError(message.to_string()));
    }

    fn on_session_finished(&mut self, result: &SessionResult, record: &PlayerRecord) {
        self.send(Notification::SessionFinished(result.clone(), *record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_forwards_calls_in_order() {
        let (tx, rx) = mpsc::channel();
        let mut presenter = ChannelPresenter::new(tx);

        presenter.on_status_changed(true);
        presenter.on_score_changed(1);
        presenter.on_missed_changed(1);
        presenter.on_status_changed(false);
        drop(presenter);

        let received: Vec<Notification> = rx.iter().collect();
        assert_eq!(
            received,
            vec![
                Notification::StatusChanged(true),
                Notification::ScoreChanged(1),
                Notification::MissedChanged(1),
                Notification::StatusChanged(false),
            ]
        );
    }

    #[test]
    fn test_disconnected_receiver_is_ignored() {
        let (tx, rx) = mpsc::channel::<Notification>();
        drop(rx);
        let mut presenter = ChannelPresenter::new(tx);
        presenter.on_connection_error("COM3 not found");
    }

    #[test]
    fn test_wraps_into_caller_message_type() {
        #[derive(Debug, PartialEq)]
        enum UiEvent {
            Pipeline(Notification),
        }

        impl From<Notification> for UiEvent {
            fn from(n: Notification) -> Self {
                UiEvent::Pipeline(n)
            }
        }

        let (tx, rx) = mpsc::channel();
        let mut presenter = ChannelPresenter::<UiEvent>::new(tx);
        presenter.on_store_error("disk full");
        assert_eq!(
            rx.recv().unwrap(),
            UiEvent::Pipeline(Notification::StoreError("disk full".to_string()))
        );
    }
}
