//! Cancelable timers for trailing-edge debouncing
//!
//! `Debouncer` keeps at most one pending timer: scheduling again aborts the
//! previous one. `ChannelScheduler` plugs it into the session actor by
//! delivering commit tickets through a channel.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Identifies one scheduled commit attempt. Newer edits get larger tickets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitTicket(pub u64);

/// Deferred delivery of commit tickets
pub trait Scheduler {
    /// Deliver `ticket` after `delay`, replacing whatever was pending
    fn schedule(&mut self, delay: Duration, ticket: CommitTicket);
    /// Drop the pending delivery, if any
    fn cancel(&mut self);
}

/// Handle to a spawned timer
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Single-slot timer on the tokio runtime
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<TimerHandle>,
}

impl Debouncer {
    pub fn new() -> Self {
        Debouncer { pending: None }
    }

    /// Run `task` after `delay` unless superseded first.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, task: F) -> &TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        self.pending.insert(TimerHandle { task: handle })
    }

    /// Returns true when a timer that had not fired yet was aborted
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let live = !handle.is_finished();
                handle.cancel();
                live
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Scheduler that sends due tickets to the owning actor
pub struct ChannelScheduler {
    debouncer: Debouncer,
    tx: mpsc::UnboundedSender<CommitTicket>,
}

impl ChannelScheduler {
    pub fn new(tx: mpsc::UnboundedSender<CommitTicket>) -> Self {
        ChannelScheduler {
            debouncer: Debouncer::new(),
            tx,
        }
    }
}

impl Scheduler for ChannelScheduler {
    fn schedule(&mut self, delay: Duration, ticket: CommitTicket) {
        let tx = self.tx.clone();
        self.debouncer.schedule(delay, move || {
            let _ = tx.send(ticket);
        });
    }

    fn cancel(&mut self) {
        self.debouncer.cancel();
    }
}
