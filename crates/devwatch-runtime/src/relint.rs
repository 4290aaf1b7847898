//! Delayed lint runs triggered by file changes.
//!
//! Every change schedules its own run after a fixed delay; runs are not
//! coalesced, so a burst of edits produces one lint run per edit. All
//! pending runs share one cancellation token and are dropped at shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A delayed lint run that is now due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelintRequest {
    /// Order in which the run was scheduled, starting at 1.
    pub sequence: u64,
}

pub struct RelintScheduler {
    delay: Duration,
    tx: UnboundedSender<RelintRequest>,
    cancel_token: CancellationToken,
    pending: Arc<AtomicUsize>,
    scheduled: AtomicU64,
}

impl RelintScheduler {
    /// Due requests are delivered on `tx`.
    pub fn new(delay: Duration, tx: UnboundedSender<RelintRequest>) -> Self {
        Self {
            delay,
            tx,
            cancel_token: CancellationToken::new(),
            pending: Arc::new(AtomicUsize::new(0)),
            scheduled: AtomicU64::new(0),
        }
    }

    /// Schedule one lint run after the configured delay.
    ///
    /// Must be called from within a tokio runtime. Returns the sequence
    /// number of the scheduled run.
    pub fn schedule(&self) -> u64 {
        let sequence = self.scheduled.fetch_add(1, Ordering::SeqCst) + 1;
        self.pending.fetch_add(1, Ordering::SeqCst);

        let delay = self.delay;
        let tx = self.tx.clone();
        let cancelled = self.cancel_token.clone();
        let pending = Arc::clone(&self.pending);

        tokio::spawn(async move {
            tokio::select! {
                () = sleep(delay) => {
                    if tx.send(RelintRequest { sequence }).is_err() {
                        debug!(sequence, "relint receiver closed, dropping run");
                    }
                }
                () = cancelled.cancelled() => {
                    debug!(sequence, "pending relint cancelled");
                }
            }
            pending.fetch_sub(1, Ordering::SeqCst);
        });

        sequence
    }

    /// Runs scheduled but not yet due.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Runs scheduled since creation.
    pub fn scheduled(&self) -> u64 {
        self.scheduled.load(Ordering::SeqCst)
    }

    /// Drop every pending run. Later calls to [`schedule`](Self::schedule)
    /// are cancelled immediately.
    pub fn cancel_all(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for RelintScheduler {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
