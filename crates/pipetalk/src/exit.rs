use std::fmt;
use std::io;

use pipetalk_frame::FrameError;
use pipetalk_log::SinkError;
use pipetalk_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Create { source, .. }
        | TransportError::Open { source, .. }
        | TransportError::Unlink { source, .. }
        | TransportError::Io(source) => io_error(context, source),
        other @ TransportError::NotAFifo { .. } => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {other}"))
        }
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::PeerClosed => CliError::new(FAILURE, format!("{context}: {err}")),
        FrameError::FrameTooLarge { .. } => CliError::new(USAGE, format!("{context}: {err}")),
    }
}

pub fn sink_error(context: &str, err: SinkError) -> CliError {
    match err {
        SinkError::Open { source, .. } => io_error(context, source),
    }
}
