//! Typhoon backend: one-shot scans and the owned periodic poll task.

use std::sync::Arc;
use std::time::Duration;

use eg_typhoon::{TyphoonScan, TyphoonScanner};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Error type for typhoon scans.
#[derive(Debug, Clone, Error)]
pub enum TyphoonError {
    /// Every checkpoint failed, so "nothing detected" can't be trusted
    #[error("All {failed} typhoon checkpoints failed")]
    AllCheckpointsFailed { failed: usize },
}

/// Messages sent from scans back to the owning model.
#[derive(Debug)]
pub enum TyphoonServiceMessage {
    /// Result of a one-off scan from [`request_scan`]
    RefreshDone(Result<TyphoonScan, TyphoonError>),
    /// Result of a [`TyphoonWatcher`] tick
    ScanDone(Result<TyphoonScan, TyphoonError>),
}

fn scan_result(scan: TyphoonScan) -> Result<TyphoonScan, TyphoonError> {
    if scan.all_failed() {
        Err(TyphoonError::AllCheckpointsFailed {
            failed: scan.failed_count(),
        })
    } else {
        Ok(scan)
    }
}

/// Run one scan on `runtime`. Sends `RefreshDone` when complete.
pub fn request_scan(
    tx: &UnboundedSender<TyphoonServiceMessage>,
    runtime: &Handle,
    scanner: Arc<TyphoonScanner>,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let scan = scanner.scan().await;
        let _ = tx.send(TyphoonServiceMessage::RefreshDone(scan_result(scan)));
    });
}

/// The periodic scan while the typhoon view is shown.
///
/// Scans once immediately, then every `period`. Stops when cancelled,
/// when the receiving model goes away, or when the watcher is dropped.
pub struct TyphoonWatcher {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl TyphoonWatcher {
    pub fn spawn(
        runtime: &Handle,
        scanner: Arc<TyphoonScanner>,
        period: Duration,
        token: CancellationToken,
        tx: UnboundedSender<TyphoonServiceMessage>,
    ) -> Self {
        // interval() panics on a zero period
        let period = period.max(Duration::from_millis(10));
        let task_token = token.clone();

        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!("Typhoon watcher started, polling every {:?}", period);

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let scan = tokio::select! {
                    _ = task_token.cancelled() => break,
                    scan = scanner.scan() => scan,
                };

                if tx.send(TyphoonServiceMessage::ScanDone(scan_result(scan))).is_err() {
                    tracing::debug!("Typhoon model dropped; stopping watcher");
                    break;
                }
            }

            tracing::info!("Typhoon watcher stopped");
        });

        Self {
            token,
            handle: Some(handle),
        }
    }

    /// Request the poll task to stop. In-flight requests are abandoned.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
            && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel and wait for the task to exit.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Typhoon watcher task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for TyphoonWatcher {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeSource;
    use eg_typhoon::CHECKPOINTS;
    use tokio::sync::mpsc::unbounded_channel;

    fn scanner(source: Arc<FakeSource>) -> Arc<TyphoonScanner> {
        Arc::new(TyphoonScanner::new(source))
    }

    #[tokio::test]
    async fn test_request_scan_calm() {
        let (tx, mut rx) = unbounded_channel();
        let source = Arc::new(FakeSource::new());

        request_scan(&tx, &Handle::current(), scanner(source.clone()));

        let Some(TyphoonServiceMessage::RefreshDone(result)) = rx.recv().await else {
            panic!("no scan result");
        };
        let scan = result.unwrap();
        assert!(scan.observations.is_empty());
        assert_eq!(source.current_calls(), CHECKPOINTS.len());
    }

    #[tokio::test]
    async fn test_request_scan_all_failed_is_error() {
        let (tx, mut rx) = unbounded_channel();
        let source = Arc::new(FakeSource::new());
        source.fail_current(true);

        request_scan(&tx, &Handle::current(), scanner(source));

        let Some(TyphoonServiceMessage::RefreshDone(result)) = rx.recv().await else {
            panic!("no scan result");
        };
        assert!(matches!(
            result,
            Err(TyphoonError::AllCheckpointsFailed { failed: 5 })
        ));
    }

    #[tokio::test]
    async fn test_watcher_scans_immediately_and_repeats() {
        let (tx, mut rx) = unbounded_channel();
        let source = Arc::new(FakeSource::new());
        let watcher = TyphoonWatcher::spawn(
            &Handle::current(),
            scanner(source.clone()),
            Duration::from_millis(20),
            CancellationToken::new(),
            tx,
        );

        for _ in 0..2 {
            assert!(rx.recv().await.is_some());
        }
        assert!(watcher.is_running());
        assert!(source.current_calls() >= 2 * CHECKPOINTS.len());

        watcher.stop().await;
    }

    #[tokio::test]
    async fn test_dropping_watcher_stops_polling() {
        let (tx, mut rx) = unbounded_channel();
        let source = Arc::new(FakeSource::new());
        let watcher = TyphoonWatcher::spawn(
            &Handle::current(),
            scanner(source.clone()),
            Duration::from_millis(20),
            CancellationToken::new(),
            tx,
        );

        assert!(rx.recv().await.is_some());
        drop(watcher);

        // The task exits and drops its sender, closing the channel
        while rx.recv().await.is_some() {}
        let calls = source.current_calls();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(source.current_calls(), calls);
    }

    #[tokio::test]
    async fn test_parent_token_cancels_watcher() {
        let (tx, mut rx) = unbounded_channel();
        let parent = CancellationToken::new();
        let watcher = TyphoonWatcher::spawn(
            &Handle::current(),
            scanner(Arc::new(FakeSource::new())),
            Duration::from_millis(20),
            parent.child_token(),
            tx,
        );

        assert!(rx.recv().await.is_some());
        parent.cancel();

        while rx.recv().await.is_some() {}
        assert!(!watcher.is_running());
    }
}
