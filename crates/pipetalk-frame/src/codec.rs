use bytes::Bytes;

/// Length of the classification prefix, including the colon.
pub const PREFIX_LEN: usize = 5;

/// Prefix tagging an interactive input line.
pub const DATA_PREFIX: &[u8; PREFIX_LEN] = b"DATA:";

/// Prefix tagging an alert notification.
pub const SIGN_PREFIX: &[u8; PREFIX_LEN] = b"SIGN:";

/// Maximum practical frame size, bounded by the read/write buffer.
///
/// Frames up to this size fit within the pipe's atomic write limit on every
/// platform this tool targets, so a single write arrives as a single read.
pub const MAX_FRAME_SIZE: usize = 1024;

/// The two alert kinds a writer can forward, with their wire identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    A,
    B,
}

impl AlertKind {
    /// Wire identifier carried after the `SIGN:` prefix.
    pub fn id(self) -> u8 {
        match self {
            AlertKind::A => 1,
            AlertKind::B => 2,
        }
    }
}

/// One classified unit of the wire protocol.
///
/// `Data` and `Signal` carry the payload after the prefix; `Unclassified`
/// carries the raw bytes verbatim for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Data(Bytes),
    Signal(Bytes),
    Unclassified(Bytes),
}

/// Build an outbound data frame: `"DATA:" + line`.
///
/// The line is copied verbatim: a trailing newline from the input stream
/// is preserved, and no escaping is applied.
pub fn data_frame(line: &str) -> Bytes {
    let mut frame = Vec::with_capacity(PREFIX_LEN + line.len());
    frame.extend_from_slice(DATA_PREFIX);
    frame.extend_from_slice(line.as_bytes());
    Bytes::from(frame)
}

/// Build an outbound signal frame: `"SIGN:1"` or `"SIGN:2"`, no trailing
/// newline.
pub fn signal_frame(kind: AlertKind) -> Bytes {
    let mut frame = Vec::with_capacity(PREFIX_LEN + 1);
    frame.extend_from_slice(SIGN_PREFIX);
    frame.push(b'0' + kind.id());
    Bytes::from(frame)
}

/// Classify an inbound frame by exact prefix match.
///
/// Decided by the first [`PREFIX_LEN`] bytes only; an empty buffer or any
/// unrecognized prefix is `Unclassified`. A binary payload containing a
/// prefix as literal content would be misclassified; that is an
/// acknowledged limitation of prefix framing. Swapping the framing rule
/// (e.g. for length-prefixed frames) only requires replacing this function.
pub fn classify(raw: &Bytes) -> Frame {
    if raw.len() >= PREFIX_LEN {
        let prefix = &raw[..PREFIX_LEN];
        if prefix == DATA_PREFIX {
            return Frame::Data(raw.slice(PREFIX_LEN..));
        }
        if prefix == SIGN_PREFIX {
            return Frame::Signal(raw.slice(PREFIX_LEN..));
        }
    }
    Frame::Unclassified(raw.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_frame_preserves_line_verbatim() {
        let frame = data_frame("hello\n");
        assert_eq!(frame.as_ref(), b"DATA:hello\n");
    }

    #[test]
    fn signal_frames_carry_wire_ids() {
        assert_eq!(signal_frame(AlertKind::A).as_ref(), b"SIGN:1");
        assert_eq!(signal_frame(AlertKind::B).as_ref(), b"SIGN:2");
    }

    #[test]
    fn classify_roundtrips_data_payload() {
        let frame = data_frame("hello\n");
        assert_eq!(
            classify(&frame),
            Frame::Data(Bytes::from_static(b"hello\n"))
        );
    }

    #[test]
    fn classify_roundtrips_signal_payload() {
        let frame = signal_frame(AlertKind::A);
        assert_eq!(classify(&frame), Frame::Signal(Bytes::from_static(b"1")));
    }

    #[test]
    fn unknown_prefixes_are_unclassified_verbatim() {
        for raw in [
            &b"XYZ:garbage"[..],
            &b"data:lowercase"[..],
            &b"DATA hello"[..],
            &b"SIGNAL:1"[..],
        ] {
            let bytes = Bytes::copy_from_slice(raw);
            assert_eq!(classify(&bytes), Frame::Unclassified(bytes.clone()));
        }
    }

    #[test]
    fn short_and_empty_buffers_are_unclassified() {
        let empty = Bytes::new();
        assert_eq!(classify(&empty), Frame::Unclassified(Bytes::new()));

        let short = Bytes::from_static(b"DAT");
        assert_eq!(classify(&short), Frame::Unclassified(short.clone()));
    }

    #[test]
    fn prefix_match_is_exact_five_bytes() {
        // "DATA" without the colon must not classify as data.
        let close = Bytes::from_static(b"DATAX:payload");
        assert_eq!(classify(&close), Frame::Unclassified(close.clone()));
    }
}
