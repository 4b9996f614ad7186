use bytes::{BufMut, BytesMut};
use std::io;
use thiserror::Error as ThisError;
use tokio_util::codec::{Decoder, Encoder};

use crate::reply::Reply;

#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("line exceeds the maximum length of {max} bytes")]
    LineTooLong { max: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Newline delimited text framing. Decodes request lines and encodes replies.
///
/// Bytes are buffered until a `\n` arrives, so a request split across several reads is still
/// seen as a single line. A trailing `\r` is dropped and does not count against the maximum
/// length. Bytes that are not valid UTF-8 are replaced with U+FFFD rather than rejected.
pub struct LineCodec {
    max_length: usize,
    // Offset up to which the buffer is known not to contain a newline.
    next_index: usize,
}

impl LineCodec {
    pub fn new(max_length: usize) -> LineCodec {
        LineCodec {
            max_length,
            next_index: 0,
        }
    }

    fn to_line(&self, bytes: &[u8]) -> Result<String, CodecError> {
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        if bytes.len() > self.max_length {
            return Err(CodecError::LineTooLong {
                max: self.max_length,
            });
        }
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let newline = src[self.next_index..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|offset| self.next_index + offset);

        let Some(newline) = newline else {
            // One extra byte for a `\r` whose `\n` has not arrived yet.
            if src.len() > self.max_length.saturating_add(1) {
                return Err(CodecError::LineTooLong {
                    max: self.max_length,
                });
            }
            // Not enough data yet, remember where to resume the search.
            self.next_index = src.len();
            return Ok(None);
        };

        self.next_index = 0;
        let line = src.split_to(newline + 1);
        self.to_line(&line[..newline]).map(Some)
    }

    // A client that closes its write half without a final newline still gets its last request
    // answered.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None if src.is_empty() => Ok(None),
            None => {
                self.next_index = 0;
                let line = src.split();
                self.to_line(&line).map(Some)
            }
        }
    }
}

impl Encoder<&Reply> for LineCodec {
    type Error = CodecError;

    fn encode(&mut self, reply: &Reply, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let text = reply.text();
        dst.reserve(text.len() + 1);
        dst.put_slice(text.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}
