//! # Search Debouncer
//!
//! Coalesces bursts of keystrokes into one downstream query.
//!
//! ## Timeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Debounce Window (1000 ms)                          │
//! │                                                                         │
//! │  t=0     submit("a")    token 1 ─┐                                     │
//! │  t=300   submit("ap")   token 2 ─┼─ token 1 invalidated                │
//! │  t=600   submit("app")  token 3 ─┼─ token 2 invalidated                │
//! │                                  │                                      │
//! │  t=1600  quiet for a full window │                                      │
//! │          ──► deliver "app"  ◄────┘  (exactly once)                     │
//! │                                                                         │
//! │  "a" and "ap" are dropped, never buffered.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tokens
//! Every `submit` returns a [`DebounceToken`]. Submitting again or calling
//! `cancel` moves the shared generation forward, and the background task only
//! delivers a value whose token is still current. Invalidation takes effect
//! immediately, even before the task has seen the command.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};

// =============================================================================
// Token
// =============================================================================

/// Identifies one pending delivery. Invalidated by the next submit or cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DebounceToken(u64);

impl DebounceToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Commands for the debounce task.
#[derive(Debug)]
enum DebounceCommand {
    Submit {
        token: DebounceToken,
        text: String,
        submitted_at: Instant,
    },
    Cancel,
    Flush,
    Shutdown,
}

/// Handle to a running debouncer.
///
/// Dropping every clone of the handle stops the background task.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    cmd_tx: mpsc::UnboundedSender<DebounceCommand>,
    generation: Arc<AtomicU64>,
    window: Duration,
}

impl SearchDebouncer {
    /// Starts a debouncer that forwards settled text to `downstream`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(window: Duration, downstream: mpsc::Sender<String>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let generation = Arc::new(AtomicU64::new(0));

        let task = DebounceTask {
            window,
            generation: generation.clone(),
            downstream,
        };
        tokio::spawn(task.run(cmd_rx));

        SearchDebouncer {
            cmd_tx,
            generation,
            window,
        }
    }

    /// The quiescence window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedules `text` for delivery once input has been quiet for a window.
    ///
    /// Replaces whatever was pending. Does not block, so it can be called
    /// straight from an input handler. The window is measured from this call,
    /// even if the background task is busy delivering an earlier value.
    pub fn submit(&self, text: impl Into<String>) -> SyncResult<DebounceToken> {
        let submitted_at = Instant::now();
        let token = DebounceToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
        self.send(DebounceCommand::Submit {
            token,
            text: text.into(),
            submitted_at,
        })?;
        Ok(token)
    }

    /// Whether `token` would still be delivered.
    pub fn is_current(&self, token: DebounceToken) -> bool {
        self.generation.load(Ordering::SeqCst) == token.0
    }

    /// Drops the pending value, if any.
    pub fn cancel(&self) -> SyncResult<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.send(DebounceCommand::Cancel)
    }

    /// Delivers the pending value now instead of waiting out the window.
    pub fn flush(&self) -> SyncResult<()> {
        self.send(DebounceCommand::Flush)
    }

    /// Stops the background task. Pending text is dropped.
    pub fn shutdown(&self) -> SyncResult<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.send(DebounceCommand::Shutdown)
    }

    fn send(&self, cmd: DebounceCommand) -> SyncResult<()> {
        self.cmd_tx.send(cmd).map_err(|_| SyncError::ShuttingDown)
    }
}

// =============================================================================
// Background Task
// =============================================================================

struct Pending {
    token: DebounceToken,
    text: String,
    deadline: Instant,
}

struct DebounceTask {
    window: Duration,
    generation: Arc<AtomicU64>,
    downstream: mpsc::Sender<String>,
}

impl DebounceTask {
    async fn run(self, mut cmd_rx: mpsc::UnboundedReceiver<DebounceCommand>) {
        debug!(window_ms = self.window.as_millis() as u64, "Search debouncer started");

        let mut pending: Option<Pending> = None;

        loop {
            let deadline = pending
                .as_ref()
                .map(|p| p.deadline)
                .unwrap_or_else(Instant::now);

            tokio::select! {
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(DebounceCommand::Submit { token, text, submitted_at }) => {
                            pending = Some(Pending {
                                token,
                                text,
                                deadline: submitted_at + self.window,
                            });
                        }
                        Some(DebounceCommand::Cancel) => {
                            pending = None;
                        }
                        Some(DebounceCommand::Flush) => {
                            if let Some(p) = pending.take() {
                                if !self.deliver(p).await {
                                    break;
                                }
                            }
                        }
                        Some(DebounceCommand::Shutdown) | None => break,
                    }
                }
                _ = sleep_until(deadline), if pending.is_some() => {
                    if let Some(p) = pending.take() {
                        if !self.deliver(p).await {
                            break;
                        }
                    }
                }
            }
        }

        info!("Search debouncer stopped");
    }

    /// Sends a settled value downstream. Returns false once nobody listens.
    async fn deliver(&self, pending: Pending) -> bool {
        if self.generation.load(Ordering::SeqCst) != pending.token.0 {
            debug!(token = pending.token.0, "Dropping superseded query");
            return true;
        }

        debug!(query = %pending.text, "Delivering settled query");
        if self.downstream.send(pending.text).await.is_err() {
            warn!("Search consumer dropped, stopping debouncer");
            return false;
        }
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
