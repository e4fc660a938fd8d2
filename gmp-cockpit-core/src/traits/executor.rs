//! UI-context executor abstraction

/// Unit of work posted to the UI context
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs jobs on the UI context
///
/// Command-state snapshots are applied through this seam instead of an
/// ambient dispatcher.
pub trait Executor: Send + Sync {
    /// Post a job; it may run before or after this call returns
    fn post(&self, job: Job);
}

/// Executor that runs every job immediately on the calling thread
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn post(&self, job: Job) {
        job();
    }
}
