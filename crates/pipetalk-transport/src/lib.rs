//! Named FIFO lifecycle management.
//!
//! A FIFO is a filesystem-visible, persistent pipe object; two unrelated
//! processes rendezvous by opening the same path with complementary modes.
//! This crate owns the create/open/close/unlink state machine:
//!
//! `Unbound -> Created|Found -> Open -> Active -> Closed`

pub mod error;
pub mod fifo;

pub use error::{Result, TransportError};
pub use fifo::{ensure_exists, FifoEndpoint, Presence, DEFAULT_FIFO_MODE};
