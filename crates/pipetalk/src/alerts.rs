//! Signal-to-message bridge.
//!
//! SIGUSR1/SIGUSR2 handlers set per-signal atomic pending flags and nothing
//! else; the write loop drains the flags on its next iteration and performs
//! the frame build/send/log itself. No I/O ever happens in the interrupt
//! context.
//!
//! SIGPIPE is ignored at the OS level so a vanished reader surfaces as an
//! `EPIPE` write error on the main loop, where termination is decided.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pipetalk_frame::AlertKind;
use signal_hook::consts::{SIGUSR1, SIGUSR2};

/// Source of pending alerts drained by the write loop.
pub trait AlertSource {
    /// Take all alerts raised since the last drain, in kind order.
    fn drain(&mut self) -> Vec<AlertKind>;
}

/// Pending-alert flags backed by real signal handlers.
pub struct AlertBridge {
    alert_a: Arc<AtomicBool>,
    alert_b: Arc<AtomicBool>,
}

impl AlertBridge {
    /// Register SIGUSR1 (alert A) and SIGUSR2 (alert B) handlers.
    pub fn install() -> std::io::Result<Self> {
        let alert_a = Arc::new(AtomicBool::new(false));
        let alert_b = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(SIGUSR1, Arc::clone(&alert_a))?;
        signal_hook::flag::register(SIGUSR2, Arc::clone(&alert_b))?;
        Ok(Self { alert_a, alert_b })
    }

    #[cfg(test)]
    fn raise(&self, kind: AlertKind) {
        match kind {
            AlertKind::A => self.alert_a.store(true, Ordering::SeqCst),
            AlertKind::B => self.alert_b.store(true, Ordering::SeqCst),
        }
    }
}

impl AlertSource for AlertBridge {
    fn drain(&mut self) -> Vec<AlertKind> {
        let mut pending = Vec::new();
        if self.alert_a.swap(false, Ordering::SeqCst) {
            pending.push(AlertKind::A);
        }
        if self.alert_b.swap(false, Ordering::SeqCst) {
            pending.push(AlertKind::B);
        }
        pending
    }
}

/// Ignore SIGPIPE for the rest of the process lifetime.
///
/// With the default disposition, a write to a FIFO whose readers are gone
/// would kill the writer outright instead of failing with `EPIPE`.
pub fn ignore_sigpipe() {
    // SAFETY: SIG_IGN installs no handler code; resetting the disposition
    // of SIGPIPE has no preconditions.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_IGN);
    }
}
