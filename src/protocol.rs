//! Line protocol codec.
//!
//! Requests are plain text, one field per line:
//!
//! ```text
//! <problem id>\n
//! <field 1>\n
//! ...
//! <field n>\n
//! ```
//!
//! The number of fields depends on the problem identifier, so the codec
//! only knows how to frame a single line; the handler decides how many to
//! pull. Responses are written verbatim with no framing at all.

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Initial capacity of the per-connection read buffer
const BUFFER_SIZE: usize = 4 * 1024;

/// Codec errors. Any of these aborts the request.
#[derive(Debug)]
pub enum ProtocolError {
    /// Peer closed the stream before sending any byte of the field
    Closed,
    /// Peer closed the stream in the middle of a line
    Truncated { partial: usize },
    /// Underlying transport error
    Io(std::io::Error),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Closed => write!(f, "connection closed before line was received"),
            ProtocolError::Truncated { partial } => {
                write!(f, "connection closed after {} bytes of an unterminated line", partial)
            }
            ProtocolError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProtocolError {
    fn from(e: std::io::Error) -> Self {
        ProtocolError::Io(e)
    }
}

/// Result of framing one line out of a buffer
#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult<'a> {
    /// A full line (without its `\n`) and the bytes it consumed
    Complete(&'a [u8], usize),
    /// No newline yet
    Incomplete,
}

/// Frame a single `\n`-terminated line from the start of `buffer`.
pub fn parse_line(buffer: &[u8]) -> ParseResult<'_> {
    match find_newline(buffer) {
        Some(pos) => ParseResult::Complete(&buffer[..pos], pos + 1),
        None => ParseResult::Incomplete,
    }
}

/// Find `\n` in buffer
fn find_newline(buffer: &[u8]) -> Option<usize> {
    buffer.iter().position(|&b| b == b'\n')
}

/// Reads newline-terminated fields off a stream.
///
/// Bytes received past the end of the current line stay buffered, so a
/// client that writes all of its fields in one segment is handled the
/// same as one that writes them line by line.
pub struct FieldReader<R> {
    reader: R,
    buffer: BytesMut,
}

impl<R: AsyncRead + Unpin> FieldReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: BytesMut::with_capacity(BUFFER_SIZE),
        }
    }

    /// Read the next field.
    ///
    /// The returned string excludes the `\n` but is otherwise raw: any
    /// `\r` or surrounding whitespace is left for the solver to trim.
    /// Invalid UTF-8 is replaced rather than rejected.
    pub async fn next_field(&mut self) -> Result<String, ProtocolError> {
        loop {
            if let ParseResult::Complete(line, consumed) = parse_line(&self.buffer) {
                let field = String::from_utf8_lossy(line).into_owned();
                self.buffer.advance(consumed);
                return Ok(field);
            }

            let n = self.reader.read_buf(&mut self.buffer).await?;
            if n == 0 {
                return Err(if self.buffer.is_empty() {
                    ProtocolError::Closed
                } else {
                    ProtocolError::Truncated {
                        partial: self.buffer.len(),
                    }
                });
            }
        }
    }

    /// Access the underlying stream, e.g. to write the response.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}
