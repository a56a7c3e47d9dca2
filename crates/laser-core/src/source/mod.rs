//! Device line sources.
//!
//! A [`LineSource`] is opened once per ingestion run and yields a
//! [`ReadLines`] reader. Dropping the reader releases the device.
//!
//! Every `read_line` call returns within roughly one device read timeout,
//! even when the device keeps sending bytes that never complete a line, so
//! the caller can check for cancellation between calls.
//!
//! - [`SerialSource`]: the target board on a serial port
//! - [`ReaderSource`]: any `io::Read`, e.g. a captured device log
//! - [`PacedSource`]: wraps another source to replay it at a fixed rate

mod framer;
mod paced;
mod reader;
mod serial;

pub use framer::{LineFramer, MAX_LINE_LENGTH, decode_line};
pub use paced::{PacedReader, PacedSource};
pub use reader::{LineReader, ReaderSource};
pub use serial::{SerialSource, available_ports};

use crate::cancel::CancelToken;
use crate::error::Result;

/// Outcome of one bounded read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadLine {
    /// A decoded line with terminators removed (not yet trimmed)
    Line(String),
    /// No complete line yet: the read timed out, or only part of a line
    /// arrived
    Timeout,
    /// The stream ended
    Eof,
}

/// An open device stream
pub trait ReadLines {
    /// Block for at most the configured timeout waiting for one line
    fn read_line(&mut self) -> Result<ReadLine>;
}

/// Something that can be opened into a line stream
pub trait LineSource {
    type Reader: ReadLines;

    /// Human-readable device name for logs and errors
    fn describe(&self) -> String;

    /// Open the device for one run. Fails with `Error::DeviceUnavailable`.
    ///
    /// Readers that wait beyond a single device read must give up once
    /// `cancel` fires.
    fn open(&mut self, cancel: &CancelToken) -> Result<Self::Reader>;
}
