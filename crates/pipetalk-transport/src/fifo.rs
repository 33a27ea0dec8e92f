use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, TransportError};

/// Permission mode for created FIFOs: read/write for everyone.
///
/// Both sides must be able to open the pipe regardless of which process
/// created it, so the FIFO is deliberately world-accessible (subject to the
/// process umask).
pub const DEFAULT_FIFO_MODE: u32 = 0o666;

/// Whether `ensure_exists` found an existing FIFO or created a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The FIFO was created by this call.
    Created,
    /// A FIFO already existed at the path.
    Found,
}

/// Ensure a FIFO exists at `path`, creating it with [`DEFAULT_FIFO_MODE`]
/// if absent.
///
/// Idempotent: a second call observes the FIFO created by the first. The
/// existence-check/create race is tolerated: losing the race to another
/// process (`EEXIST`) is reported as [`Presence::Found`]. An existing path
/// that is not a FIFO is an error; it is never removed or opened.
pub fn ensure_exists(path: impl AsRef<Path>) -> Result<Presence> {
    let path = path.as_ref();

    if let Some(presence) = check_existing(path)? {
        return Ok(presence);
    }

    debug!(?path, "creating named fifo");
    match mkfifo(path, DEFAULT_FIFO_MODE) {
        Ok(()) => {
            info!(?path, "fifo created");
            Ok(Presence::Created)
        }
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            // Another process won the create race.
            match check_existing(path)? {
                Some(_) => Ok(Presence::Found),
                None => Err(TransportError::Create {
                    path: path.to_path_buf(),
                    source: err,
                }),
            }
        }
        Err(err) => Err(TransportError::Create {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

fn check_existing(path: &Path) -> Result<Option<Presence>> {
    match std::fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_fifo() => {
            debug!(?path, "fifo found");
            Ok(Some(Presence::Found))
        }
        Ok(_) => Err(TransportError::NotAFifo {
            path: path.to_path_buf(),
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(TransportError::Create {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

fn mkfifo(path: &Path, mode: u32) -> std::io::Result<()> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| std::io::Error::from(std::io::ErrorKind::InvalidInput))?;

    // SAFETY: `c_path` is a valid NUL-terminated string for the duration of
    // the call; mkfifo does not retain the pointer.
    let rc = unsafe { libc::mkfifo(c_path.as_ptr(), mode as libc::mode_t) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

/// One end of an open named FIFO.
///
/// Exclusive per-process ownership of a single open handle; the shared
/// resource is the OS pipe object, never the handle. Implements `Read` and
/// `Write` by delegating to the underlying file, so frame readers/writers
/// can wrap it directly.
pub struct FifoEndpoint {
    file: File,
    path: PathBuf,
}

impl FifoEndpoint {
    /// Open the write end of the FIFO at `path` (blocking).
    ///
    /// Standard FIFO rendezvous semantics: the open does not return until a
    /// reader has opened the same path.
    pub fn open_writer(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .write(true)
            .open(&path)
            .map_err(|e| TransportError::Open {
                path: path.clone(),
                source: e,
            })?;
        debug!(?path, "opened fifo write end");
        Ok(Self { file, path })
    }

    /// Open the read end of the FIFO at `path` (blocking until a writer
    /// opens the complementary end).
    pub fn open_reader(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .open(&path)
            .map_err(|e| TransportError::Open {
                path: path.clone(),
                source: e,
            })?;
        debug!(?path, "opened fifo read end");
        Ok(Self { file, path })
    }

    /// Close the handle and remove the FIFO from the filesystem namespace.
    ///
    /// Writer-side graceful teardown. The reader must not unlink, since the
    /// writer may restart and recreate the pipe.
    pub fn close_and_unlink(self) -> Result<()> {
        let path = self.path.clone();
        drop(self.file);
        std::fs::remove_file(&path).map_err(|e| TransportError::Unlink { path, source: e })?;
        info!("fifo closed and unlinked");
        Ok(())
    }

    /// The path this endpoint is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for FifoEndpoint {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for FifoEndpoint {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl std::fmt::Debug for FifoEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FifoEndpoint")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pipetalk-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn ensure_exists_is_idempotent() {
        let dir = unique_temp_dir("ensure");
        let path = dir.join("test.fifo");

        assert_eq!(ensure_exists(&path).unwrap(), Presence::Created);
        assert_eq!(ensure_exists(&path).unwrap(), Presence::Found);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn ensure_exists_rejects_regular_file() {
        let dir = unique_temp_dir("notafifo");
        let path = dir.join("regular.fifo");
        std::fs::write(&path, b"not a fifo").unwrap();

        let err = ensure_exists(&path).unwrap_err();
        assert!(matches!(err, TransportError::NotAFifo { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn open_reader_fails_without_fifo() {
        let dir = unique_temp_dir("missing");
        let path = dir.join("missing.fifo");

        let err = FifoEndpoint::open_reader(&path).unwrap_err();
        assert!(matches!(err, TransportError::Open { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn rendezvous_write_then_read() {
        let dir = unique_temp_dir("rendezvous");
        let path = dir.join("rdv.fifo");
        ensure_exists(&path).unwrap();

        let reader_path = path.clone();
        let reader = std::thread::spawn(move || {
            let mut endpoint = FifoEndpoint::open_reader(&reader_path).unwrap();
            let mut data = Vec::new();
            endpoint.read_to_end(&mut data).unwrap();
            data
        });

        let mut writer = FifoEndpoint::open_writer(&path).unwrap();
        writer.write_all(b"ping").unwrap();
        writer.close_and_unlink().unwrap();

        let data = reader.join().unwrap();
        assert_eq!(data, b"ping");
        assert!(!path.exists(), "fifo path should be unlinked");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn close_and_unlink_removes_path() {
        let dir = unique_temp_dir("unlink");
        let path = dir.join("gone.fifo");
        ensure_exists(&path).unwrap();

        let writer_path = path.clone();
        let drain = std::thread::spawn(move || {
            let mut endpoint = FifoEndpoint::open_reader(&writer_path).unwrap();
            let mut sink = Vec::new();
            let _ = endpoint.read_to_end(&mut sink);
        });

        let writer = FifoEndpoint::open_writer(&path).unwrap();
        assert_eq!(writer.path(), path.as_path());
        writer.close_and_unlink().unwrap();
        drain.join().unwrap();

        assert!(!path.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
