use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Level::Info => GREEN,
            Level::Warn => YELLOW,
            Level::Error => RED,
        }
    }
}

/// Errors that can occur constructing a sink.
///
/// Per-call I/O failures after construction are best-effort and not
/// reported; only construction is fallible.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The log file could not be opened for append.
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SinkError>;

/// A capability-polymorphic log sink.
///
/// Components take `&mut dyn LogSink` at the seams; whether lines also land
/// in a file is the constructor's choice, not the caller's.
pub trait LogSink {
    fn log(&mut self, level: Level, message: &str);
}

/// Console-only sink: colored, timestamped lines on standard output.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for ConsoleSink {
    fn log(&mut self, level: Level, message: &str) {
        write_console(&timestamp(), level, message);
    }
}

/// Console + file sink.
///
/// Renders the same line to the console and, uncolored, to an append-mode
/// file it exclusively owns. Flushed after every call; these files exist
/// to observe IPC behavior from outside, so durability wins over
/// throughput. The file handle is closed exactly once, on drop.
#[derive(Debug)]
pub struct FileSink {
    file: File,
}

impl FileSink {
    /// Open `path` for append, creating it if absent.
    ///
    /// A failure here is fatal for the owning process; there is no
    /// degraded console-only fallback.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|e| SinkError::Open {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(Self { file })
    }
}

impl LogSink for FileSink {
    fn log(&mut self, level: Level, message: &str) {
        let stamp = timestamp();
        write_console(&stamp, level, message);
        let _ = writeln!(self.file, "[{stamp}] {}: {message}", level.as_str());
        let _ = self.file.flush();
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn write_console(stamp: &str, level: Level, message: &str) {
    let mut out = std::io::stdout().lock();
    let _ = writeln!(
        out,
        "[{stamp}] {}{}{RESET}: {message}",
        level.color(),
        level.as_str()
    );
    let _ = out.flush();
}
