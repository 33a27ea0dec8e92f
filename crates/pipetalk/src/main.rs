mod alerts;
mod cmd;
mod exit;
mod logging;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(name = "pipetalk", version, about = "Framed text messaging over a named FIFO")]
struct Cli {
    /// Diagnostic log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum diagnostic log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "PIPETALK_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match cmd::run(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_write_subcommand() {
        let cli = Cli::try_parse_from(["pipetalk", "write", "/tmp/chat.fifo", "--stop-word", "exit"])
            .expect("write args should parse");
        assert!(matches!(cli.command, Command::Write(_)));
    }

    #[test]
    fn parses_read_subcommand_with_log_files() {
        let cli = Cli::try_parse_from([
            "pipetalk",
            "read",
            "/tmp/chat.fifo",
            "--log-file",
            "Log.txt",
            "--signal-log-file",
            "Sign.txt",
            "--max-frames",
            "5",
        ])
        .expect("read args should parse");

        let args = match cli.command {
            Command::Read(args) => args,
            other => panic!("expected read command, got {other:?}"),
        };
        assert_eq!(args.max_frames, Some(5));
    }

    #[test]
    fn fifo_path_defaults_to_myfifo() {
        let cli = Cli::try_parse_from(["pipetalk", "write"]).expect("bare write should parse");
        let args = match cli.command {
            Command::Write(args) => args,
            other => panic!("expected write command, got {other:?}"),
        };
        assert_eq!(args.path.to_str(), Some("myfifo"));
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["pipetalk", "broadcast"]).is_err());
    }

    #[test]
    fn log_level_reads_from_environment() {
        std::env::set_var("PIPETALK_LOG_LEVEL", "debug");
        let cli = Cli::try_parse_from(["pipetalk", "write"]).expect("bare write should parse");
        std::env::remove_var("PIPETALK_LOG_LEVEL");

        assert!(matches!(cli.log_level, LogLevel::Debug));
    }
}
