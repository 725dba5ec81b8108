//! Cancellable delayed events.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::ViewEvent;

/// Handle to a task that sleeps, then posts one [`ViewEvent`].
///
/// Cancelling aborts the task outright, so a cancelled delay can never
/// deliver its event. Dropping the handle cancels it as well.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Spawns the delay on the current tokio runtime.
    ///
    /// Returns `None` when called outside a runtime. The event is then
    /// never posted, so whatever it would have triggered must happen
    /// some other way (e.g. a manual dismissal).
    #[must_use]
    pub fn post_after(
        delay: Duration,
        events: UnboundedSender<ViewEvent>,
        event: ViewEvent,
    ) -> Option<Self> {
        let Ok(runtime) = Handle::try_current() else {
            log::warn!("No tokio runtime, {event:?} will not be scheduled");
            return None;
        };

        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if events.send(event).is_err() {
                log::debug!("Dropping {event:?}: binder is gone");
            }
        });
        Some(Self { handle })
    }

    /// Aborts the delay if it has not fired yet.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Whether the task has fired or been cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
