//! Scheduling context shared by all sensor timers.

use std::future::Future;

use contracts::CollectorError;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Handle to the runtime that drives sensor timers.
///
/// All sensors of a process share one scheduler; each sensor's ticks stay
/// serialized by its own timer task while different sensors run in
/// parallel.
#[derive(Clone, Debug)]
pub struct Scheduler {
    handle: Handle,
}

impl Scheduler {
    /// Capture the current tokio runtime.
    ///
    /// # Errors
    /// `SchedulingUnavailable` when called outside a runtime; surfaced
    /// synchronously so no sensor is ever constructed without a backing
    /// scheduling context.
    pub fn current() -> Result<Self, CollectorError> {
        Handle::try_current()
            .map(|handle| Self { handle })
            .map_err(|e| CollectorError::scheduling_unavailable(e.to_string()))
    }

    /// Wrap an explicit runtime handle.
    pub fn from_handle(handle: Handle) -> Self {
        Self { handle }
    }

    pub(crate) fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle.spawn(future)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::CollectorError;

    #[test]
    fn current_outside_runtime_is_a_scheduling_error() {
        let err = Scheduler::current().unwrap_err();
        assert!(matches!(err, CollectorError::SchedulingUnavailable { .. }));
    }

    #[tokio::test]
    async fn current_inside_runtime_succeeds() {
        assert!(Scheduler::current().is_ok());
    }
}
