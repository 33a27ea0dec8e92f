use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;

pub mod read;
pub mod version;
pub mod write;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Forward input lines and signal alerts into the FIFO.
    Write(WriteArgs),
    /// Classify and log frames arriving on the FIFO.
    Read(ReadArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command) -> CliResult<i32> {
    match command {
        Command::Write(args) => write::run(args),
        Command::Read(args) => read::run(args),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// FIFO path shared with the reader.
    #[arg(default_value = "myfifo")]
    pub path: PathBuf,
    /// Input line that triggers graceful shutdown (compared without the
    /// trailing newline).
    #[arg(long, value_name = "WORD")]
    pub stop_word: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// FIFO path shared with the writer.
    #[arg(default_value = "myfifo")]
    pub path: PathBuf,
    /// General log file (data frames, diagnostics).
    #[arg(long, value_name = "FILE", default_value = "Log.txt")]
    pub log_file: PathBuf,
    /// Dedicated signal log file.
    #[arg(long, value_name = "FILE", default_value = "Sign.txt")]
    pub signal_log_file: PathBuf,
    /// Exit after receiving N frames.
    #[arg(long, value_name = "N")]
    pub max_frames: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
