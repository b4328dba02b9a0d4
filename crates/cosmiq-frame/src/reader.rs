use std::io::BufRead;

use crate::demux::{DemuxConfig, Demultiplexer, Demuxed};
use crate::error::{FrameError, Result};

const INITIAL_LINE_CAPACITY: usize = 64;

/// Reads capture lines from any `BufRead` source.
///
/// Line terminators are stripped; all other trimming is left to the frame
/// parser.
pub struct CaptureReader<R> {
    inner: R,
    line: String,
    lines_read: usize,
}

impl<R: BufRead> CaptureReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: String::with_capacity(INITIAL_LINE_CAPACITY),
            lines_read: 0,
        }
    }

    /// Read the next line.
    ///
    /// Returns `Ok(None)` at end of input. A line that is not valid UTF-8 is
    /// an I/O error of kind `InvalidData`.
    pub fn read_line(&mut self) -> Result<Option<&str>> {
        self.line.clear();
        let read = self.inner.read_line(&mut self.line).map_err(FrameError::Io)?;
        if read == 0 {
            return Ok(None);
        }
        self.lines_read += 1;

        let trimmed = self.line.trim_end_matches(['\r', '\n']);
        Ok(Some(trimmed))
    }

    /// Number of lines returned so far.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Consume the reader and return the inner source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Read a whole capture and demultiplex it.
pub fn read_capture<R: BufRead>(source: R, config: &DemuxConfig) -> Result<Demuxed> {
    let mut reader = CaptureReader::new(source);
    let mut demux = Demultiplexer::with_config(*config);

    while let Some(line) = reader.read_line()? {
        demux.push_line(line);
    }

    Ok(demux.finish())
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, ErrorKind};

    use super::*;

    #[test]
    fn reads_lines_without_terminators() {
        let mut reader = CaptureReader::new(Cursor::new("a\r\nb\n\nc"));

        assert_eq!(reader.read_line().unwrap(), Some("a"));
        assert_eq!(reader.read_line().unwrap(), Some("b"));
        assert_eq!(reader.read_line().unwrap(), Some(""));
        assert_eq!(reader.read_line().unwrap(), Some("c"));
        assert_eq!(reader.read_line().unwrap(), None);
        assert_eq!(reader.lines_read(), 4);
    }

    #[test]
    fn read_capture_demultiplexes_everything() {
        let text = "42AAAACAFEBABE\r\n44BBBBFFFFFFFFFFFF\n\n44CCCCC20012340000FFFFFFFFFFFF\n";
        let out = read_capture(Cursor::new(text), &DemuxConfig::default()).unwrap();

        assert_eq!(out.header.hex(), "CAFEBABE");
        assert_eq!(out.body.byte_len(), 18);
        assert_eq!(out.stats.lines, 4);
        assert_eq!(out.stats.short_lines, 1);
    }

    #[test]
    fn invalid_utf8_is_an_io_error() {
        let bytes = b"42AAAACAFEBABE\n\xFF\xFE\n".to_vec();
        let err = read_capture(Cursor::new(bytes), &DemuxConfig::default()).unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::InvalidData));
    }

    #[test]
    fn empty_capture() {
        let out = read_capture(Cursor::new(""), &DemuxConfig::default()).unwrap();
        assert_eq!(out.stats.lines, 0);
        assert!(out.body.is_empty());
    }

    #[test]
    fn into_inner_returns_source() {
        let reader = CaptureReader::new(Cursor::new("x"));
        let _ = reader.get_ref();
        let inner = reader.into_inner();
        assert_eq!(inner.position(), 0);
    }
}
