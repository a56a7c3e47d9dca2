use std::collections::VecDeque;

use encoding_rs::{DecoderResult, UTF_8};
use tracing::debug;

/// Longest line accepted from the board; anything longer is dropped
pub const MAX_LINE_LENGTH: usize = 1024;

/// Splits a byte stream into `\n`-terminated lines.
///
/// Terminators and a preceding `\r` are stripped. A line that grows past
/// [`MAX_LINE_LENGTH`] without a terminator is discarded, and framing
/// resumes after the next `\n`.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: Vec<u8>,
    ready: VecDeque<Vec<u8>>,
    discarding: bool,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            match memchr::memchr(b'\n', bytes) {
                Some(pos) => {
                    self.extend(&bytes[..pos]);
                    self.finish_line();
                    bytes = &bytes[pos + 1..];
                }
                None => {
                    self.extend(bytes);
                    break;
                }
            }
        }
    }

    /// Next complete line, if one has been framed
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        self.ready.pop_front()
    }

    /// Take any unterminated bytes left at end of input
    pub fn take_remainder(&mut self) -> Option<Vec<u8>> {
        let discarding = std::mem::take(&mut self.discarding);
        if discarding || self.buffer.is_empty() {
            self.buffer.clear();
            return None;
        }
        let mut line = std::mem::take(&mut self.buffer);
        strip_cr(&mut line);
        Some(line)
    }

    fn extend(&mut self, bytes: &[u8]) {
        if self.discarding {
            return;
        }
        if self.buffer.len() + bytes.len() > MAX_LINE_LENGTH {
            debug!(
                "Dropping line longer than {} bytes",
                MAX_LINE_LENGTH
            );
            self.buffer.clear();
            self.discarding = true;
            return;
        }
        self.buffer.extend_from_slice(bytes);
    }

    fn finish_line(&mut self) {
        if std::mem::take(&mut self.discarding) {
            return;
        }
        let mut line = std::mem::take(&mut self.buffer);
        strip_cr(&mut line);
        self.ready.push_back(line);
    }
}

fn strip_cr(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
}

/// Decode one line as UTF-8, skipping malformed byte sequences.
///
/// Well-formed text is kept as is, including any U+FFFD the board sent.
pub fn decode_line(bytes: &[u8]) -> String {
    let mut decoder = UTF_8.new_decoder_without_bom_handling();
    let capacity = decoder
        .max_utf8_buffer_length_without_replacement(bytes.len())
        .unwrap_or(bytes.len());
    let mut text = String::with_capacity(capacity);

    let mut rest = bytes;
    let mut dropped = 0;
    loop {
        let (result, read) = decoder.decode_to_string_without_replacement(rest, &mut text, true);
        rest = &rest[read..];
        match result {
            DecoderResult::InputEmpty => break,
            DecoderResult::Malformed(bad, _) => dropped += usize::from(bad),
            DecoderResult::OutputFull => text.reserve(rest.len() + 4),
        }
    }

    if dropped > 0 {
        debug!("Dropped {} malformed bytes in line", dropped);
    }
    text
}
