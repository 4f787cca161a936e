// Newline framing for the request stream

use bytes::{Buf, BytesMut};
use std::io;
use tokio_util::codec::Decoder;

/// Longest request line accepted, in bytes.
pub const MAX_LINE_BYTES: usize = 4 * 1024 * 1024;

/// One line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    Text(String),
    /// A line that cannot be a request: not UTF-8, or longer than the limit.
    Invalid(String),
}

/// Splits input on `\n` like `LinesCodec`, but reports bad lines as
/// [`InputLine::Invalid`] items instead of decoder errors, so the stream
/// keeps going. Only I/O failures end it.
#[derive(Debug)]
pub struct RequestLineCodec {
    max_length: usize,
    next_index: usize,
    discarding: bool,
}

impl RequestLineCodec {
    pub fn new() -> Self {
        Self::with_max_length(MAX_LINE_BYTES)
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length,
            next_index: 0,
            discarding: false,
        }
    }

    fn too_long(&self) -> InputLine {
        InputLine::Invalid(format!("line exceeds {} bytes", self.max_length))
    }
}

impl Default for RequestLineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for RequestLineCodec {
    type Item = InputLine;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> io::Result<Option<InputLine>> {
        let newline = buf[self.next_index..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|offset| self.next_index + offset);

        match newline {
            Some(end) => {
                let line = buf.split_to(end + 1);
                self.next_index = 0;
                if std::mem::take(&mut self.discarding) || end > self.max_length {
                    return Ok(Some(self.too_long()));
                }
                Ok(Some(decode_line(&line[..end])))
            }
            None if self.discarding => {
                buf.advance(buf.len());
                self.next_index = 0;
                Ok(None)
            }
            None if buf.len() > self.max_length => {
                // Drop what we have and skip ahead to the next newline.
                buf.advance(buf.len());
                self.next_index = 0;
                self.discarding = true;
                Ok(None)
            }
            None => {
                self.next_index = buf.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> io::Result<Option<InputLine>> {
        if let Some(line) = self.decode(buf)? {
            return Ok(Some(line));
        }
        self.next_index = 0;
        if std::mem::take(&mut self.discarding) {
            buf.clear();
            return Ok(Some(self.too_long()));
        }
        if buf.is_empty() {
            return Ok(None);
        }
        let line = buf.split_to(buf.len());
        Ok(Some(decode_line(&line)))
    }
}

fn decode_line(bytes: &[u8]) -> InputLine {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => InputLine::Text(text.to_string()),
        Err(e) => InputLine::Invalid(format!("input is not valid UTF-8 ({})", e)),
    }
}
