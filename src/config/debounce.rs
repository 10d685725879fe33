//! Debouncing of file-system change bursts.
//!
//! A single logical save usually produces several events (truncate, write,
//! metadata, rename). Reading the file on the first one risks seeing it
//! half-written, so reloads wait until events stop arriving.
//!
//! ```text
//!            event                      timer fires
//!   Idle ──────────────▶ PendingReload ─────────────▶ reload ──▶ Idle
//!                          │      ▲
//!                          └──────┘
//!                       event: restart timer
//! ```

use std::future::Future;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    PendingReload,
}

/// Coalesces events into at most one action per quiet period.
#[derive(Debug)]
pub struct Debouncer {
    period: Duration,
    state: DebounceState,
}

impl Debouncer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            state: DebounceState::Idle,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Drive the state machine until `shutdown` fires (or its sender is
    /// dropped) or the event channel closes.
    ///
    /// `on_settle` runs once each time the timer elapses without a newer
    /// event. A reload that is pending when the loop exits is discarded.
    pub async fn run<F, Fut>(
        mut self,
        mut events: mpsc::UnboundedReceiver<()>,
        mut shutdown: oneshot::Receiver<()>,
        mut on_settle: F,
    ) where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        loop {
            match self.state {
                DebounceState::Idle => tokio::select! {
                    _ = &mut shutdown => break,
                    event = events.recv() => match event {
                        Some(()) => {
                            tracing::trace!(period = ?self.period, "Change detected, arming reload timer");
                            self.state = DebounceState::PendingReload;
                        }
                        None => break,
                    },
                },
                DebounceState::PendingReload => tokio::select! {
                    _ = &mut shutdown => break,
                    event = events.recv() => match event {
                        // The sleep below is recreated on the next pass, which restarts the timer.
                        Some(()) => tracing::trace!("Change detected, restarting reload timer"),
                        None => break,
                    },
                    _ = tokio::time::sleep(self.period) => {
                        on_settle().await;
                        self.state = DebounceState::Idle;
                    }
                },
            }
        }

        tracing::debug!(state = ?self.state, "Debouncer stopped");
    }
}
