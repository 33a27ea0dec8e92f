use std::io::{ErrorKind, Read};

use bytes::Bytes;
use tracing::{debug, trace};

use crate::codec::MAX_FRAME_SIZE;
use crate::error::{FrameError, Result};

/// Reads raw frames from any `Read` stream.
///
/// One bounded read per frame: the bytes returned by a single read are one
/// complete frame, inheriting the message-boundary behavior of the
/// underlying pipe. There is no cross-read buffering or reassembly.
pub struct FrameReader<T> {
    inner: T,
}

impl<T: Read> FrameReader<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Read the next raw frame (blocking).
    ///
    /// Returns `Ok(None)` when the peer has closed the write end (a
    /// zero-byte read). Interrupted reads are retried transparently; any
    /// other read error is fatal for the caller.
    pub fn read_frame(&mut self) -> Result<Option<Bytes>> {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => {
                    debug!("zero-byte read, peer closed the write end");
                    return Ok(None);
                }
                Ok(n) => {
                    trace!(bytes = n, "frame received");
                    return Ok(Some(Bytes::copy_from_slice(&buf[..n])));
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
