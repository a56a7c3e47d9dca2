use std::time::Duration;

use super::{LineSource, ReadLine, ReadLines};
use crate::cancel::CancelToken;
use crate::error::Result;

/// Replays another source at a fixed line rate.
///
/// Used to feed a captured log through the pipeline at roughly the speed
/// the board produced it. The pause after each line ends early when the
/// run is cancelled.
pub struct PacedSource<S> {
    inner: S,
    interval: Duration,
}

impl<S: LineSource> PacedSource<S> {
    pub fn new(inner: S, interval: Duration) -> Self {
        Self { inner, interval }
    }
}

impl<S: LineSource> LineSource for PacedSource<S> {
    type Reader = PacedReader<S::Reader>;

    fn describe(&self) -> String {
        format!("{} (every {}ms)", self.inner.describe(), self.interval.as_millis())
    }

    fn open(&mut self, cancel: &CancelToken) -> Result<Self::Reader> {
        Ok(PacedReader {
            inner: self.inner.open(cancel)?,
            interval: self.interval,
            cancel: cancel.clone(),
            pending_pause: false,
        })
    }
}

pub struct PacedReader<R> {
    inner: R,
    interval: Duration,
    cancel: CancelToken,
    pending_pause: bool,
}

impl<R: ReadLines> ReadLines for PacedReader<R> {
    fn read_line(&mut self) -> Result<ReadLine> {
        if std::mem::take(&mut self.pending_pause) && !self.cancel.pause(self.interval) {
            return Ok(ReadLine::Timeout);
        }
        let line = self.inner.read_line()?;
        if matches!(line, ReadLine::Line(_)) {
            self.pending_pause = true;
        }
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ReaderSource;
    use std::io::Cursor;
    use std::time::Instant;

    fn paced(data: &str, interval: Duration) -> PacedSource<ReaderSource<Cursor<Vec<u8>>>> {
        let source = ReaderSource::new("capture", Cursor::new(data.as_bytes().to_vec()));
        PacedSource::new(source, interval)
    }

    #[test]
    fn test_pauses_between_lines() {
        let mut source = paced("HIT\nMISS\n", Duration::from_millis(40));
        let mut reader = source.open(&CancelToken::new()).unwrap();

        let start = Instant::now();
        assert_eq!(reader.read_line().unwrap(), ReadLine::Line("HIT".to_string()));
        assert_eq!(reader.read_line().unwrap(), ReadLine::Line("MISS".to_string()));
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_cancel_ends_pause() {
        let cancel = CancelToken::new();
        let mut source = paced("HIT\nMISS\n", Duration::from_secs(10));
        let mut reader = source.open(&cancel).unwrap();

        assert_eq!(reader.read_line().unwrap(), ReadLine::Line("HIT".to_string()));
        cancel.cancel();
        let start = Instant::now();
        assert_eq!(reader.read_line().unwrap(), ReadLine::Timeout);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_describe() {
        let source = paced("", Duration::from_millis(250));
        assert_eq!(source.describe(), "capture (every 250ms)");
    }
}
