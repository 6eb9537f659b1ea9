use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use quiz_core::model::SessionToken;

/// Work a session schedules for later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Play the current question's sound.
    PlayPrompt,
    /// Leave answer feedback and move on.
    Advance,
}

/// A fired timer, stamped with the session and question it was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred {
    pub token: SessionToken,
    pub question: usize,
    pub action: DeferredAction,
}

/// Single-shot timers owned by the game loop.
///
/// Fired timers are delivered through `next`, one at a time, on the owner's
/// task. Cancelling aborts the sleeping task, so a cancelled timer never
/// delivers; `cancel_all` also drops anything already delivered but not yet
/// received.
pub struct SessionTimers {
    tx: mpsc::UnboundedSender<Deferred>,
    rx: mpsc::UnboundedReceiver<Deferred>,
    pending: Vec<(DeferredAction, JoinHandle<()>)>,
}

impl SessionTimers {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            pending: Vec::new(),
        }
    }

    /// Deliver `event` after `delay`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn schedule(&mut self, delay: Duration, event: Deferred) {
        self.pending.retain(|(_, handle)| !handle.is_finished());
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver lives as long as `self`; a send error means the
            // timers were dropped and the event has nobody to act on it.
            let _ = tx.send(event);
        });
        self.pending.push((event.action, handle));
    }

    /// Abort pending timers of one kind.
    pub fn cancel(&mut self, action: DeferredAction) {
        self.pending.retain(|(kind, handle)| {
            if *kind == action {
                handle.abort();
                false
            } else {
                true
            }
        });
    }

    /// Abort every pending timer and discard undelivered events.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain(..) {
            handle.abort();
        }
        while self.rx.try_recv().is_ok() {}
    }

    /// Number of timers that have not fired yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending
            .iter()
            .filter(|(_, handle)| !handle.is_finished())
            .count()
    }

    /// Wait for the next fired timer.
    ///
    /// Cancel safe: dropping the future loses no event.
    pub async fn next(&mut self) -> Option<Deferred> {
        self.rx.recv().await
    }
}

impl Default for SessionTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SessionTimers {
    fn drop(&mut self) {
        for (_, handle) in self.pending.drain(..) {
            handle.abort();
        }
    }
}
