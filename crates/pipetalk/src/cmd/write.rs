use std::io::{BufRead, ErrorKind, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use pipetalk_frame::{FrameError, FrameWriter};
use pipetalk_log::{ConsoleSink, Level, LogSink};
use pipetalk_transport::{ensure_exists, FifoEndpoint, Presence};

use crate::alerts::{ignore_sigpipe, AlertBridge, AlertSource};
use crate::cmd::WriteArgs;
use crate::exit::{frame_error, io_error, transport_error, CliError, CliResult, INTERNAL, SUCCESS};

/// Why the write loop stopped.
#[derive(Debug, PartialEq, Eq)]
enum LoopEnd {
    /// End-of-input on the input stream.
    EndOfInput,
    /// The configured stop word was entered.
    StopWord,
    /// The reader-closed flag was set by a broken-pipe write.
    ReaderClosed,
}

/// Records that the peer stopped consuming.
///
/// Set exactly once, on the first broken-pipe write failure; reads decide
/// termination. Atomic because alert sends and line sends share it, and the
/// flag contract is write-once-then-stable.
struct ReaderClosed(AtomicBool);

impl ReaderClosed {
    fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Set the flag; true only on the first transition.
    fn mark(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn run(args: WriteArgs) -> CliResult<i32> {
    let mut sink = ConsoleSink::new();
    sink.log(Level::Info, &format!("PID: {}", std::process::id()));

    match ensure_exists(&args.path) {
        Ok(Presence::Created) => sink.log(
            Level::Info,
            &format!("fifo created: {}", args.path.display()),
        ),
        Ok(Presence::Found) => {
            sink.log(Level::Info, &format!("fifo found: {}", args.path.display()))
        }
        Err(err) => {
            sink.log(Level::Error, &format!("error creating fifo: {err}"));
            return Err(transport_error("fifo setup failed", err));
        }
    }

    ignore_sigpipe();
    let mut bridge = AlertBridge::install().map_err(|err| {
        CliError::new(INTERNAL, format!("signal handler setup failed: {err}"))
    })?;

    sink.log(Level::Info, "waiting for readers...");
    let endpoint = match FifoEndpoint::open_writer(&args.path) {
        Ok(endpoint) => endpoint,
        Err(err) => {
            sink.log(Level::Error, &format!("error opening fifo: {err}"));
            return Err(transport_error("fifo open failed", err));
        }
    };

    let mut writer = FrameWriter::new(endpoint);
    let stdin = std::io::stdin();
    let prompt = stdin.is_terminal();
    let end = write_loop(
        stdin.lock(),
        &mut writer,
        &mut bridge,
        &mut sink,
        args.stop_word.as_deref(),
        prompt,
    )?;
    tracing::debug!(?end, "write loop finished");

    if let Err(err) = writer.into_inner().close_and_unlink() {
        sink.log(Level::Warn, &format!("fifo cleanup failed: {err}"));
    }
    sink.log(Level::Info, "terminating gracefully");
    Ok(SUCCESS)
}

/// The blocking main loop of the writer process.
///
/// Pending alerts are drained at the top of every iteration, so alert
/// frames raised while the loop was blocked on input go out before the next
/// data frame. A broken-pipe failure on any send sets the reader-closed
/// flag once; the loop observes it and terminates cooperatively.
fn write_loop<R: BufRead, W: Write, A: AlertSource>(
    mut input: R,
    writer: &mut FrameWriter<W>,
    alerts: &mut A,
    sink: &mut dyn LogSink,
    stop_word: Option<&str>,
    prompt: bool,
) -> CliResult<LoopEnd> {
    let reader_closed = ReaderClosed::new();
    let mut line = String::new();

    loop {
        for kind in alerts.drain() {
            sink.log(Level::Info, &format!("SIGN:{}", kind.id()));
            match writer.send_signal(kind) {
                Ok(n) => sink.log(Level::Info, &format!("writer: wrote {n} bytes")),
                Err(FrameError::PeerClosed) => note_peer_closed(&reader_closed, sink),
                Err(err) => sink.log(
                    Level::Error,
                    &format!("error sending SIGN:{}: {err}", kind.id()),
                ),
            }
        }

        if reader_closed.is_set() {
            sink.log(Level::Error, "reader is closed, terminating...");
            return Ok(LoopEnd::ReaderClosed);
        }

        if prompt {
            let mut out = std::io::stdout();
            let _ = out.write_all(b"input text: ");
            let _ = out.flush();
        }

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => return Ok(LoopEnd::EndOfInput),
            Ok(_) => {
                if let Some(word) = stop_word {
                    if line.trim_end_matches('\n') == word {
                        return Ok(LoopEnd::StopWord);
                    }
                }

                sink.log(
                    Level::Info,
                    &format!("sending message: {}", line.trim_end_matches('\n')),
                );
                match writer.send_data(&line) {
                    Ok(n) => sink.log(Level::Info, &format!("writer: wrote {n} bytes")),
                    Err(FrameError::PeerClosed) => {
                        note_peer_closed(&reader_closed, sink);
                        sink.log(Level::Error, "reader is closed, terminating...");
                        return Ok(LoopEnd::ReaderClosed);
                    }
                    // An oversized line loses only itself; the session
                    // continues with the next line.
                    Err(err @ FrameError::FrameTooLarge { .. }) => {
                        sink.log(Level::Error, &format!("write error: {err}"));
                    }
                    Err(err) => {
                        sink.log(Level::Error, &format!("write error: {err}"));
                        return Err(frame_error("send failed", err));
                    }
                }
            }
            // Interrupted input (a signal landed mid-read) is retried; the
            // drain at the top of the loop picks up the alert.
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => {
                sink.log(Level::Error, "input error, terminating...");
                return Err(io_error("reading input", err));
            }
        }
    }
}

fn note_peer_closed(flag: &ReaderClosed, sink: &mut dyn LogSink) {
    if flag.mark() {
        sink.log(Level::Error, "broken pipe: no reader available");
    }
}
