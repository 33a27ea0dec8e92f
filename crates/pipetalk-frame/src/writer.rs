use std::io::{ErrorKind, Write};

use tracing::debug;

use crate::codec::{data_frame, signal_frame, AlertKind, MAX_FRAME_SIZE};
use crate::error::{FrameError, Result};

/// Writes complete frames to any `Write` stream.
///
/// A vanished peer is surfaced as [`FrameError::PeerClosed`] rather than a
/// raw broken-pipe I/O error, so callers can drive the reader-disconnect
/// recovery path without inspecting `ErrorKind`s.
pub struct FrameWriter<T> {
    inner: T,
}

impl<T: Write> FrameWriter<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Send one complete frame (blocking). Returns the number of bytes
    /// written.
    pub fn send(&mut self, frame: &[u8]) -> Result<usize> {
        if frame.len() > MAX_FRAME_SIZE {
            return Err(FrameError::FrameTooLarge {
                size: frame.len(),
                max: MAX_FRAME_SIZE,
            });
        }

        let mut offset = 0usize;
        while offset < frame.len() {
            match self.inner.write(&frame[offset..]) {
                Ok(0) => {
                    debug!(written = offset, "zero-byte write, peer closed");
                    return Err(FrameError::PeerClosed);
                }
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                    debug!(written = offset, "broken pipe during frame write");
                    return Err(FrameError::PeerClosed);
                }
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()?;
        Ok(frame.len())
    }

    /// Build and send a data frame from an input line.
    pub fn send_data(&mut self, line: &str) -> Result<usize> {
        self.send(&data_frame(line))
    }

    /// Build and send a signal frame for an alert kind.
    pub fn send_signal(&mut self, kind: AlertKind) -> Result<usize> {
        self.send(&signal_frame(kind))
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                    debug!("broken pipe during flush");
                    return Err(FrameError::PeerClosed);
                }
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

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
