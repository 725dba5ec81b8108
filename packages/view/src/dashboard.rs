//! Embedded dashboard loading with timeout fallback.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::{ScheduledTask, ViewEvent};

/// Visible state of the embedded dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DashboardState {
    /// Not started yet.
    Idle,
    /// Loader shown, embed hidden.
    Loading {
        /// 1-based load attempt.
        attempt: u32,
    },
    /// Embed shown.
    Loaded,
    /// Fallback panel with a retry control shown.
    Fallback,
}

/// Load-timeout state machine for an embedded third-party dashboard.
///
/// Every load attempt schedules a timeout. Whichever of load, error or
/// timeout happens first decides the outcome and cancels the pending
/// timeout, so a late timeout can never replace a successful load.
#[derive(Debug)]
pub struct DashboardEmbed {
    state: DashboardState,
    attempt: u32,
    timeout: Duration,
    timer: Option<ScheduledTask>,
    events: UnboundedSender<ViewEvent>,
}

impl DashboardEmbed {
    /// Creates an idle embed whose timeouts are posted to `events`.
    #[must_use]
    pub const fn new(timeout: Duration, events: UnboundedSender<ViewEvent>) -> Self {
        Self {
            state: DashboardState::Idle,
            attempt: 0,
            timeout,
            timer: None,
            events,
        }
    }

    /// Current visible state.
    #[must_use]
    pub const fn state(&self) -> DashboardState {
        self.state
    }

    /// Starts a load attempt. Outside a tokio runtime no timeout is armed
    /// and the attempt only ends through a load or error signal.
    pub fn start(&mut self) -> DashboardState {
        self.cancel_timer();
        self.attempt += 1;
        self.timer = ScheduledTask::post_after(
            self.timeout,
            self.events.clone(),
            ViewEvent::DashboardTimedOut {
                attempt: self.attempt,
            },
        );
        self.state = DashboardState::Loading {
            attempt: self.attempt,
        };
        log::debug!("Dashboard load attempt {} started", self.attempt);
        self.state
    }

    /// The embed finished loading.
    pub fn on_load(&mut self) -> DashboardState {
        if matches!(self.state, DashboardState::Loading { .. }) {
            self.cancel_timer();
            self.state = DashboardState::Loaded;
        }
        self.state
    }

    /// The embed reported a load error.
    pub fn on_error(&mut self) -> DashboardState {
        if matches!(self.state, DashboardState::Loading { .. }) {
            log::warn!("Dashboard load attempt {} failed", self.attempt);
            self.show_fallback();
        }
        self.state
    }

    /// A load timeout fired. Ignored unless it belongs to the attempt in
    /// progress.
    pub fn on_timeout(&mut self, attempt: u32) -> DashboardState {
        if self.state == (DashboardState::Loading { attempt }) {
            log::warn!(
                "Dashboard load attempt {attempt} timed out after {:?}",
                self.timeout
            );
            self.show_fallback();
        } else {
            log::debug!("Ignoring stale dashboard timeout for attempt {attempt}");
        }
        self.state
    }

    /// The user asked to retry from the fallback panel.
    pub fn retry(&mut self) -> DashboardState {
        self.start()
    }

    /// Connectivity came back. Retries only if the fallback is showing.
    pub fn on_online(&mut self) -> DashboardState {
        if self.state == DashboardState::Fallback {
            return self.start();
        }
        self.state
    }

    fn show_fallback(&mut self) {
        self.cancel_timer();
        self.state = DashboardState::Fallback;
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[tokio::test(start_paused = true)]
    async fn timeout_shows_fallback() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut embed = DashboardEmbed::new(TIMEOUT, tx);

        assert_eq!(embed.start(), DashboardState::Loading { attempt: 1 });

        let event = tokio::time::timeout(Duration::from_secs(11), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event, ViewEvent::DashboardTimedOut { attempt: 1 });
        assert_eq!(embed.on_timeout(1), DashboardState::Fallback);
    }

    #[test]
    fn starts_without_runtime_and_settles_on_load() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut embed = DashboardEmbed::new(TIMEOUT, tx);

        assert_eq!(embed.start(), DashboardState::Loading { attempt: 1 });
        assert_eq!(embed.on_load(), DashboardState::Loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn load_cancels_timeout() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut embed = DashboardEmbed::new(TIMEOUT, tx);
        embed.start();

        assert_eq!(embed.on_load(), DashboardState::Loaded);

        let result = tokio::time::timeout(Duration::from_secs(60), rx.recv()).await;
        assert!(result.is_err());
        assert_eq!(embed.state(), DashboardState::Loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn error_shows_fallback_and_retry_reloads() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut embed = DashboardEmbed::new(TIMEOUT, tx);
        embed.start();

        assert_eq!(embed.on_error(), DashboardState::Fallback);
        assert_eq!(embed.retry(), DashboardState::Loading { attempt: 2 });
        assert_eq!(embed.on_load(), DashboardState::Loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_timeout_is_ignored() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut embed = DashboardEmbed::new(TIMEOUT, tx);
        embed.start();
        embed.on_error();
        embed.retry();

        assert_eq!(embed.on_timeout(1), DashboardState::Loading { attempt: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn online_retries_only_from_fallback() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut embed = DashboardEmbed::new(TIMEOUT, tx);

        assert_eq!(embed.on_online(), DashboardState::Idle);

        embed.start();
        embed.on_error();
        assert_eq!(embed.on_online(), DashboardState::Loading { attempt: 2 });

        embed.on_load();
        assert_eq!(embed.on_online(), DashboardState::Loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn late_load_after_fallback_keeps_fallback() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut embed = DashboardEmbed::new(TIMEOUT, tx);
        embed.start();
        embed.on_timeout(1);

        assert_eq!(embed.on_load(), DashboardState::Fallback);
    }
}
