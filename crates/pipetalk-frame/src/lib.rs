//! Prefix-tagged text framing for FIFO IPC.
//!
//! Every frame is a byte sequence whose first five bytes select its kind:
//!
//! - `DATA:` for an interactive input line, payload copied verbatim
//! - `SIGN:` for an alert notification (`SIGN:1` / `SIGN:2`)
//!
//! Anything else is `Unclassified`. Classification is stateless and purely
//! prefix-based: each read's bytes are treated as one complete frame, with
//! no cross-read reassembly. Contiguous writes under the pipe's atomic
//! write limit arrive as one read, which is a simplifying assumption of
//! the transport, not something this layer enforces.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    classify, data_frame, signal_frame, AlertKind, Frame, DATA_PREFIX, MAX_FRAME_SIZE, PREFIX_LEN,
    SIGN_PREFIX,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
