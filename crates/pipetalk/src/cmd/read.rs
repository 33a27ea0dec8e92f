use bytes::Bytes;
use pipetalk_frame::{classify, Frame, FrameReader};
use pipetalk_log::{FileSink, Level, LogSink};
use pipetalk_transport::{ensure_exists, FifoEndpoint};

use crate::cmd::ReadArgs;
use crate::exit::{frame_error, sink_error, transport_error, CliResult, SUCCESS};

pub fn run(args: ReadArgs) -> CliResult<i32> {
    let mut general = FileSink::create(&args.log_file)
        .map_err(|err| sink_error("general log setup failed", err))?;
    let mut signal = FileSink::create(&args.signal_log_file)
        .map_err(|err| sink_error("signal log setup failed", err))?;

    general.log(Level::Info, &format!("PID: {}", std::process::id()));

    // Either side may start first; creating here lets the reader block in
    // the open rendezvous instead of failing on a missing path.
    if let Err(err) = ensure_exists(&args.path) {
        general.log(Level::Error, &format!("error creating fifo: {err}"));
        return Err(transport_error("fifo setup failed", err));
    }

    general.log(Level::Info, "waiting for writers...");
    let endpoint = match FifoEndpoint::open_reader(&args.path) {
        Ok(endpoint) => endpoint,
        Err(err) => {
            general.log(Level::Error, &format!("error opening fifo: {err}"));
            return Err(transport_error("fifo open failed", err));
        }
    };
    general.log(Level::Info, "got a writer");

    let mut reader = FrameReader::new(endpoint);
    let mut received = 0usize;

    loop {
        match reader.read_frame() {
            Ok(Some(raw)) => {
                route(&raw, &mut general, &mut signal);
                received += 1;
                if args.max_frames.is_some_and(|max| received >= max) {
                    general.log(Level::Info, &format!("received {received} frames, done"));
                    break;
                }
            }
            // Zero-byte read: the writer closed its end. The reader never
            // unlinks; the writer may restart and recreate the pipe.
            Ok(None) => {
                general.log(Level::Info, "writer closed the pipe");
                break;
            }
            Err(err) => {
                general.log(Level::Error, &format!("read error: {err}"));
                return Err(frame_error("read failed", err));
            }
        }
    }

    Ok(SUCCESS)
}

/// Route one classified frame to the logs.
///
/// Data frames go to the general log (content line plus a byte count),
/// signal frames to the dedicated signal log, and anything unclassified to
/// the general log at ERROR with the raw content preserved for diagnosis.
fn route(raw: &Bytes, general: &mut dyn LogSink, signal: &mut dyn LogSink) {
    let text = String::from_utf8_lossy(raw);
    match classify(raw) {
        Frame::Data(_) => {
            general.log(
                Level::Info,
                &format!("data reader: {}", text.trim_end_matches('\n')),
            );
            general.log(Level::Info, &format!("reader: read {} bytes", raw.len()));
        }
        Frame::Signal(_) => {
            signal.log(Level::Info, &text);
        }
        Frame::Unclassified(_) => {
            general.log(Level::Error, &format!("unclassified frame: {text}"));
        }
    }
}
