//! Timestamped log sinks, the observable output of the IPC demo.
//!
//! Each line is rendered as `[YYYY-MM-DD HH:MM:SS] LEVEL: message`. The
//! console variant colors the level; the file variant additionally appends
//! an uncolored, identically-timestamped line to an owned append-mode file
//! and flushes after every call, so external readers of the log file see
//! each entry immediately.
//!
//! This is deliberately separate from the stderr `tracing` diagnostics:
//! these files are part of the system's contract, not its plumbing.

pub mod sink;

pub use sink::{ConsoleSink, FileSink, Level, LogSink, Result, SinkError};
