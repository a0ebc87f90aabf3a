//! Pending approvals badge.
//!
//! A background task polls the approvals count and publishes it on a watch
//! channel. Cancellation is checked after every fetch so that a response
//! arriving after teardown is discarded.

use std::sync::Arc;
use std::time::Duration;

use console_api::ConsoleApi;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct PendingApprovalsBadge {
    count: watch::Receiver<Option<u32>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for PendingApprovalsBadge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingApprovalsBadge")
            .field("count", &*self.count.borrow())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl PendingApprovalsBadge {
    /// Start polling immediately, then every `interval`. Must be called inside a tokio runtime.
    #[must_use]
    pub fn spawn(api: Arc<dyn ConsoleApi>, interval: Duration) -> Self {
        let (tx, count) = watch::channel(None);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(poll_loop(api, interval, tx, cancel.clone()));
        Self {
            count,
            cancel,
            task: Some(task),
        }
    }

    /// Last published count; `None` until the first successful fetch.
    #[must_use]
    pub fn count(&self) -> Option<u32> {
        *self.count.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<u32>> {
        self.count.clone()
    }

    /// Stop polling and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::debug!(error = %e, "approvals poller ended abnormally");
        }
    }
}

impl Drop for PendingApprovalsBadge {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop(
    api: Arc<dyn ConsoleApi>,
    interval: Duration,
    tx: watch::Sender<Option<u32>>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            () = cancel.cancelled() => break,
            r = api.get_pending_approvals_count() => r,
        };
        if cancel.is_cancelled() {
            break;
        }

        match result {
            Ok(n) => {
                tx.send_if_modified(|current| {
                    let changed = *current != Some(n);
                    *current = Some(n);
                    changed
                });
            }
            Err(e) => tracing::debug!(error = %e, "pending approvals fetch failed"),
        }
    }
    tracing::debug!("approvals poller stopped");
}
