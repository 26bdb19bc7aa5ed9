//! Shared helpers for the integration tests
use std::io::{self, Cursor, Read, Write};

/// Stand-in for a serial port.
///
/// Reply bytes are scripted up front. Every `flush` closes one frame, so tests can check
/// both the bytes and how they were split into writes.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Cursor<Vec<u8>>,
    pending: Vec<u8>,
    frames: Vec<Vec<u8>>,
}

impl MockTransport {
    pub fn new() -> MockTransport {
        MockTransport::default()
    }

    pub fn with_replies(replies: &[u8]) -> MockTransport {
        MockTransport {
            replies: Cursor::new(replies.to_vec()),
            ..MockTransport::default()
        }
    }

    /// Everything written, in order
    pub fn written(&self) -> Vec<u8> {
        self.frames.concat()
    }

    /// Written bytes, split at each flush
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    /// Reply bytes not consumed by the driver
    pub fn unread(&self) -> usize {
        self.replies.get_ref().len() - self.replies.position() as usize
    }
}

impl Read for MockTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.replies.read(buf)
    }
}

impl Write for MockTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            self.frames.push(std::mem::take(&mut self.pending));
        }
        Ok(())
    }
}

/// A transport whose writes always fail, as after unplugging the module
#[derive(Debug, Default)]
pub struct BrokenTransport;

impl Read for BrokenTransport {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "device gone"))
    }
}

impl Write for BrokenTransport {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "device gone"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A transport that accepts every write but never answers, as a module that has hung
#[derive(Debug, Default)]
pub struct SilentTransport {
    pub written: Vec<u8>,
}

impl Read for SilentTransport {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::TimedOut, "no reply"))
    }
}

impl Write for SilentTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
