use std::io::{self, Cursor, Read, Write};

/// Scripted replies in, captured bytes out.
///
/// Only what the unit tests need; the integration tests in `glk-tests` use a variant that
/// also records how the bytes were split into writes.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Cursor<Vec<u8>>,
    pub written: Vec<u8>,
}

impl MockTransport {
    pub fn with_replies(replies: &[u8]) -> MockTransport {
        MockTransport {
            replies: Cursor::new(replies.to_vec()),
            written: Vec::new(),
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.replies.position()
    }
}

impl Read for MockTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.replies.read(buf)
    }
}

impl Write for MockTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
