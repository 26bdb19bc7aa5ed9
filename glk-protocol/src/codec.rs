/// Writing frames to and reading replies from a byte stream
use std::io::{self, ErrorKind, Read, Write};

use crate::{
    error::Error,
    protocol::{DirectoryEntry, Frame},
};

impl Frame {
    /// Writes the whole frame and flushes the stream.
    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_all(self.as_bytes())?;
        writer.flush()
    }
}

/// Blocking read of exactly one byte
pub fn read_byte(reader: &mut impl Read) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn truncated(err: io::Error, what: &str) -> Error {
    if err.kind() == ErrorKind::UnexpectedEof {
        Error::Protocol(format!("truncated {} reply", what))
    } else {
        Error::Transport(err)
    }
}

/// Reads a fixed-size reply. A stream that ends early is a protocol error.
pub fn read_reply<const N: usize>(reader: &mut impl Read, what: &str) -> Result<[u8; N], Error> {
    let mut buf = [0u8; N];
    reader
        .read_exact(&mut buf)
        .map_err(|err| truncated(err, what))?;
    Ok(buf)
}

/// Reads the reply of the filesystem directory query: one count byte followed by
/// that many four byte records. Unused slots are skipped.
pub fn read_directory(reader: &mut impl Read) -> Result<Vec<DirectoryEntry>, Error> {
    let [count] = read_reply::<1>(reader, "directory")?;
    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let record = read_reply::<4>(reader, "directory")?;
        if let Some(entry) = DirectoryEntry::from_record(record) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

pub(crate) const KEY_CONTINUES: u8 = 0x80;
pub(crate) const KEY_CODE_MASK: u8 = 0x7F;

/// Key codes of one key poll reply, read lazily from the stream.
///
/// Every byte carries a key code in its low seven bits, zero meaning no key.
/// A set top bit announces that more bytes follow. The sequence ends after the first
/// byte with a clear top bit, so each instance consumes exactly one reply.
pub struct KeyPresses<'a, R: Read> {
    reader: &'a mut R,
    done: bool,
}

impl<'a, R: Read> KeyPresses<'a, R> {
    pub fn new(reader: &'a mut R) -> KeyPresses<'a, R> {
        KeyPresses {
            reader,
            done: false,
        }
    }
}

impl<R: Read> Iterator for KeyPresses<'_, R> {
    type Item = Result<u8, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let byte = match read_byte(self.reader) {
                Ok(byte) => byte,
                Err(err) => {
                    self.done = true;
                    return Some(Err(truncated(err, "key press")));
                }
            };
            log::trace!("Key poll reply byte: {:02x}", byte);
            self.done = byte & KEY_CONTINUES == 0;
            let code = byte & KEY_CODE_MASK;
            if code != 0 {
                return Some(Ok(code));
            }
        }
        None
    }
}

impl<R: Read> std::iter::FusedIterator for KeyPresses<'_, R> {}

#[cfg(feature = "tokio")]
mod framed {
    use bytes::{BufMut, BytesMut};
    use tokio_util::codec::{Decoder, Encoder};

    use super::{KEY_CODE_MASK, KEY_CONTINUES};
    use crate::{error::Error, protocol::Frame};

    /// Codec for use with `tokio_util::codec::Framed`.
    ///
    /// Encodes command frames and decodes complete key poll replies.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct GlkCodec;

    impl Encoder<Frame> for GlkCodec {
        type Error = Error;

        fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
            dst.reserve(item.len());
            dst.put_slice(item.as_bytes());
            Ok(())
        }
    }

    impl Decoder for GlkCodec {
        type Item = Vec<u8>;
        type Error = Error;

        fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
            let Some(end) = src.iter().position(|b| b & KEY_CONTINUES == 0) else {
                return Ok(None);
            };
            let reply = src.split_to(end + 1);
            Ok(Some(
                reply
                    .iter()
                    .map(|b| b & KEY_CODE_MASK)
                    .filter(|code| *code != 0)
                    .collect(),
            ))
        }

        fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
            match self.decode(src)? {
                Some(keys) => Ok(Some(keys)),
                None if src.is_empty() => Ok(None),
                None => Err(Error::Protocol("truncated key press reply".to_string())),
            }
        }
    }

}

#[cfg(feature = "tokio")]
pub use framed::GlkCodec;
