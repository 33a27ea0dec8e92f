use std::path::PathBuf;

/// Errors that can occur in FIFO transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to create the FIFO at the specified path.
    #[error("failed to create fifo at {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to open the FIFO at the specified path.
    #[error("failed to open fifo at {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The path exists but is not a FIFO.
    #[error("existing path is not a fifo: {path}")]
    NotAFifo { path: PathBuf },

    /// Failed to unlink the FIFO path during teardown.
    #[error("failed to unlink fifo at {path}: {source}")]
    Unlink {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred on the open FIFO handle.
    #[error("fifo I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
