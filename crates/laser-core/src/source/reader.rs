use std::io::{ErrorKind, Read};

use tracing::debug;

use super::{LineFramer, LineSource, ReadLine, ReadLines, decode_line};
use crate::cancel::CancelToken;
use crate::error::{Error, Result};

const READ_CHUNK: usize = 256;

/// Frames and decodes lines from a byte reader.
///
/// Each call performs at most one successful device read. Timeouts
/// (`TimedOut`, `WouldBlock`) and chunks that complete no line surface as
/// [`ReadLine::Timeout`]; any other I/O error is a
/// [`Error::StreamInterrupted`].
pub struct LineReader<R> {
    inner: R,
    framer: LineFramer,
    buf: [u8; READ_CHUNK],
    eof: bool,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            framer: LineFramer::new(),
            buf: [0; READ_CHUNK],
            eof: false,
        }
    }
}

impl<R: Read> ReadLines for LineReader<R> {
    fn read_line(&mut self) -> Result<ReadLine> {
        loop {
            if let Some(bytes) = self.framer.next_line() {
                return Ok(ReadLine::Line(decode_line(&bytes)));
            }
            if self.eof {
                return Ok(ReadLine::Eof);
            }

            match self.inner.read(&mut self.buf) {
                Ok(0) => {
                    debug!("End of device stream");
                    self.eof = true;
                    if let Some(rest) = self.framer.take_remainder() {
                        return Ok(ReadLine::Line(decode_line(&rest)));
                    }
                }
                Ok(n) => {
                    self.framer.push(&self.buf[..n]);
                    // Hand control back between chunks so a stream that never
                    // completes a line can't hold the caller
                    return Ok(match self.framer.next_line() {
                        Some(bytes) => ReadLine::Line(decode_line(&bytes)),
                        None => ReadLine::Timeout,
                    });
                }
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    return Ok(ReadLine::Timeout);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::StreamInterrupted(e.to_string())),
            }
        }
    }
}

/// Line source over an already-open reader (capture files, pipes).
///
/// Can be opened once; a second `open` reports the device as unavailable.
pub struct ReaderSource<R> {
    name: String,
    reader: Option<R>,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader: Some(reader),
        }
    }
}

impl<R: Read> LineSource for ReaderSource<R> {
    type Reader = LineReader<R>;

    fn describe(&self) -> String {
        self.name.clone()
    }

    fn open(&mut self, _cancel: &CancelToken) -> Result<Self::Reader> {
        self.reader
            .take()
            .map(LineReader::new)
            .ok_or_else(|| Error::DeviceUnavailable {
                port: self.name.clone(),
                message: "stream already consumed".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    fn read_all<R: Read>(reader: &mut LineReader<R>) -> Vec<ReadLine> {
        let mut out = Vec::new();
        loop {
            let line = reader.read_line().unwrap();
            let done = line == ReadLine::Eof;
            out.push(line);
            if done {
                return out;
            }
        }
    }

    /// Yields one scripted result per `read` call
    struct Scripted(Vec<io::Result<Vec<u8>>>);

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() {
                return Ok(0);
            }
            let bytes = self.0.remove(0)?;
            buf[..bytes.len()].copy_from_slice(&bytes);
            Ok(bytes.len())
        }
    }

    #[test]
    fn test_reads_lines_then_eof() {
        let mut reader = LineReader::new(Cursor::new(b"GAME START\r\nHIT\nGAME STOP".to_vec()));
        assert_eq!(
            read_all(&mut reader),
            vec![
                ReadLine::Line("GAME START".to_string()),
                ReadLine::Line("HIT".to_string()),
                ReadLine::Line("GAME STOP".to_string()),
                ReadLine::Eof,
            ]
        );
        assert_eq!(reader.read_line().unwrap(), ReadLine::Eof);
    }

    #[test]
    fn test_timeout_is_not_an_error() {
        let mut reader = LineReader::new(Scripted(vec![
            Err(io::Error::new(ErrorKind::TimedOut, "timed out")),
            Ok(b"HIT\n".to_vec()),
        ]));
        assert_eq!(reader.read_line().unwrap(), ReadLine::Timeout);
        assert_eq!(reader.read_line().unwrap(), ReadLine::Line("HIT".to_string()));
    }

    #[test]
    fn test_partial_chunk_returns_control() {
        let mut reader = LineReader::new(Scripted(vec![
            Ok(b"GAME ".to_vec()),
            Ok(b"START\nHI".to_vec()),
            Ok(b"T\n".to_vec()),
        ]));
        assert_eq!(reader.read_line().unwrap(), ReadLine::Timeout);
        assert_eq!(reader.read_line().unwrap(), ReadLine::Line("GAME START".to_string()));
        assert_eq!(reader.read_line().unwrap(), ReadLine::Line("HIT".to_string()));
        assert_eq!(reader.read_line().unwrap(), ReadLine::Eof);
    }

    #[test]
    fn test_unterminated_noise_never_blocks() {
        let mut chunks: Vec<io::Result<Vec<u8>>> = (0..200).map(|_| Ok(vec![b'x'; 64])).collect();
        chunks.push(Ok(b"\nMISS\n".to_vec()));
        let mut reader = LineReader::new(Scripted(chunks));

        for _ in 0..200 {
            assert_eq!(reader.read_line().unwrap(), ReadLine::Timeout);
        }
        // The overlong run is dropped; framing resumes after its newline
        assert_eq!(reader.read_line().unwrap(), ReadLine::Line("MISS".to_string()));
    }

    #[test]
    fn test_interrupted_is_retried() {
        let mut reader = LineReader::new(Scripted(vec![
            Err(io::Error::new(ErrorKind::Interrupted, "signal")),
            Ok(b"MISS\n".to_vec()),
        ]));
        assert_eq!(reader.read_line().unwrap(), ReadLine::Line("MISS".to_string()));
    }

    #[test]
    fn test_other_errors_interrupt_stream() {
        let mut reader = LineReader::new(Scripted(vec![
            Ok(b"HIT\n".to_vec()),
            Err(io::Error::new(ErrorKind::BrokenPipe, "device unplugged")),
        ]));
        assert_eq!(reader.read_line().unwrap(), ReadLine::Line("HIT".to_string()));
        assert!(matches!(
            reader.read_line(),
            Err(Error::StreamInterrupted(msg)) if msg.contains("unplugged")
        ));
    }

    #[test]
    fn test_reader_source_opens_once() {
        let mut source = ReaderSource::new("capture.log", Cursor::new(Vec::new()));
        assert_eq!(source.describe(), "capture.log");
        let cancel = CancelToken::new();
        assert!(source.open(&cancel).is_ok());
        assert!(matches!(source.open(&cancel), Err(Error::DeviceUnavailable { .. })));
    }
}
