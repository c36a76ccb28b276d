//! Cooperative cancellation passed into every handler.
//!
//! The dispatcher never cancels anything itself; handlers may observe the
//! signal or ignore it.

use tokio::sync::watch;

/// Returned by handlers that stop because they observed cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation was cancelled")]
pub struct Cancelled;

/// Owner side: flips the signal for every clone of [`CancelSignal`].
#[derive(Debug)]
pub struct CancelSource {
    tx: watch::Sender<bool>,
}

impl CancelSource {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: Some(self.tx.subscribe()),
        }
    }

    pub fn cancel(&self) {
        // send_replace never fails, even with no live receivers
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side handed to handlers.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn none() -> Self {
        Self { rx: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// `Err(Cancelled)` once cancellation was requested.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves when cancellation is requested; pending forever otherwise.
    pub async fn cancelled(&self) {
        if let Some(rx) = &self.rx {
            let mut rx = rx.clone();
            if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
                return;
            }
        }
        // source dropped without cancelling, or no source at all
        std::future::pending::<()>().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn none_is_never_cancelled() {
        let signal = CancelSignal::none();
        assert!(!signal.is_cancelled());
        assert!(signal.check().is_ok());
    }

    #[test]
    fn cancel_reaches_every_clone() {
        let source = CancelSource::new();
        let a = source.signal();
        let b = a.clone();
        source.cancel();
        assert!(a.is_cancelled());
        assert_eq!(b.check(), Err(Cancelled));
        assert!(source.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_future_wakes_up() {
        let source = CancelSource::new();
        let signal = source.signal();
        let waiter = tokio::spawn(async move { signal.cancelled().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        source.cancel();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
    }

    #[tokio::test]
    async fn none_never_resolves() {
        let signal = CancelSignal::none();
        let res = tokio::time::timeout(Duration::from_millis(30), signal.cancelled()).await;
        assert!(res.is_err());
    }
}
