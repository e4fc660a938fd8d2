//! UI dispatcher executor

use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use gmp_cockpit_core::traits::{Executor, Job};

/// Queues jobs for the UI context
///
/// Documents post from any task; the owning UI loop drains the queue with
/// `run_pending`.
pub struct UiDispatcher {
    sender: UnboundedSender<Job>,
    receiver: Mutex<UnboundedReceiver<Job>>,
}

impl UiDispatcher {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    /// Run every queued job on the calling thread
    ///
    /// Jobs posted while draining run in the same call. Returns the number of
    /// jobs executed.
    pub fn run_pending(&self) -> usize {
        let mut executed = 0;
        loop {
            let next = self.receiver.lock().try_recv();
            match next {
                Ok(job) => {
                    job();
                    executed += 1;
                }
                Err(_) => break,
            }
        }
        executed
    }

    pub fn has_pending(&self) -> bool {
        !self.receiver.lock().is_empty()
    }
}

impl Default for UiDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for UiDispatcher {
    fn post(&self, job: Job) {
        if self.sender.send(job).is_err() {
            log::warn!("UI dispatcher queue closed; job dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn jobs_run_only_when_drained() {
        let dispatcher = UiDispatcher::new();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let seen = Arc::clone(&counter);
            dispatcher.post(Box::new(move || {
                seen.fetch_add(1, Ordering::SeqCst);
            }));
        }

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(dispatcher.has_pending());
        assert_eq!(dispatcher.run_pending(), 3);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert!(!dispatcher.has_pending());
    }
}
