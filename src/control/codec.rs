use std::io::{Error, ErrorKind};
use std::result::Result;

use bytes::{BufMut, BytesMut};
use tokio::net::UnixStream;
use tokio_util::codec::{Decoder, Encoder, Framed};
use twoway::find_bytes;

/// BIRD closes every reply with an empty "0000" status line
pub const REPLY_END: &[u8] = b"0000 \n";

pub type ReplyProtocol = Framed<UnixStream, ReplyCodec>;

/// Frames BIRD CLI exchanges: one command line out, one complete reply in
#[derive(Debug, Default)]
pub struct ReplyCodec {
    // Bytes already searched for REPLY_END
    scanned: usize,
}

impl ReplyCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for ReplyCodec {
    type Item = String;
    type Error = Error;

    // Search the accumulated buffer (not just the latest read) so a terminator
    // split across two reads is still found
    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Error> {
        let start = self
            .scanned
            .saturating_sub(REPLY_END.len() - 1)
            .min(buf.len());
        if find_bytes(&buf[start..], REPLY_END).is_some() {
            self.scanned = 0;
            let reply = buf.split_to(buf.len());
            Ok(Some(String::from_utf8_lossy(&reply).into_owned()))
        } else {
            self.scanned = buf.len();
            Ok(None)
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Error> {
        match self.decode(buf)? {
            Some(reply) => Ok(Some(reply)),
            None if buf.is_empty() => Ok(None),
            None => Err(Error::new(
                ErrorKind::UnexpectedEof,
                format!("reply ended without terminator after {} bytes", buf.len()),
            )),
        }
    }
}

impl Encoder<String> for ReplyCodec {
    type Error = Error;

    // Exactly one trailing newline, whatever the caller passed
    fn encode(&mut self, command: String, buf: &mut BytesMut) -> Result<(), Error> {
        let command = command.trim_matches('\n');
        buf.reserve(command.len() + 1);
        buf.put_slice(command.as_bytes());
        buf.put_u8(b'\n');
        Ok(())
    }
}
