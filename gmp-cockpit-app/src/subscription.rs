//! Cancellable subscriptions for long-lived feeds

use std::future::Future;

use tokio::task::JoinHandle;

/// Owns a background feed task; cancelling or dropping aborts it
pub struct Subscription {
    name: String,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Spawn `feed` on the current tokio runtime
    pub fn spawn<F>(name: impl Into<String>, feed: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self::from_handle(name, tokio::spawn(feed))
    }

    pub fn from_handle(name: impl Into<String>, handle: JoinHandle<()>) -> Self {
        Self {
            name: name.into(),
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the feed is still running
    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Abort the feed; idempotent
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            log::debug!("Subscription {} cancelled", self.name);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
