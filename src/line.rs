//! Inbound line buffering.
//!
//! Accumulates raw transport bytes and yields one complete line at a time,
//! with the CRLF terminator stripped. Lines are limited to 512 bytes by
//! default, per the IRC standard.

use bytes::BytesMut;

use crate::error::{ProtocolError, Result};

/// Default maximum line length in bytes, including the terminator.
pub const DEFAULT_MAX_LINE_LEN: usize = 512;

/// Buffer that splits an unbounded byte stream into CRLF-terminated lines.
#[derive(Debug)]
pub struct LineBuffer {
    buf: BytesMut,
    /// Index of the next byte to check for a newline.
    next_index: usize,
    max_len: usize,
}

impl LineBuffer {
    /// Create a buffer with the default 512-byte line limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a buffer with a custom line limit.
    pub fn with_max_len(max_len: usize) -> Self {
        LineBuffer {
            buf: BytesMut::new(),
            next_index: 0,
            max_len,
        }
    }

    /// Append raw bytes from the transport.
    pub fn extend(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Pop the next complete line, with its CR/LF terminator stripped.
    ///
    /// Returns `Ok(None)` when no complete line is buffered yet. An
    /// over-long or non-UTF-8 line is an error; the offending bytes are
    /// consumed, so the caller may keep reading.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        if let Some(offset) = self.buf[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = self.buf.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if line.len() > self.max_len {
                return Err(ProtocolError::MessageTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
            }

            let mut text = String::from_utf8(line.to_vec())?;
            text.truncate(text.trim_end_matches(['\r', '\n']).len());
            Ok(Some(text))
        } else {
            self.next_index = self.buf.len();

            if self.buf.len() > self.max_len {
                return Err(ProtocolError::MessageTooLong {
                    actual: self.buf.len(),
                    limit: self.max_len,
                });
            }

            Ok(None)
        }
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
