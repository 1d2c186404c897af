//! Async test helpers
//!
//! Timeout wrappers around the channels the crate hands out.

use tokio::sync::{broadcast, watch};
use tokio::time::{timeout, Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvTimeoutError {
    Timeout,
    Closed,
}

impl std::fmt::Display for RecvTimeoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecvTimeoutError::Timeout => write!(f, "receive operation timed out"),
            RecvTimeoutError::Closed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for RecvTimeoutError {}

/// Receive the next broadcast value, skipping over lag notifications
pub async fn recv_timeout<T: Clone>(
    rx: &mut broadcast::Receiver<T>,
    duration: Duration,
) -> Result<T, RecvTimeoutError> {
    timeout(duration, async {
        loop {
            match rx.recv().await {
                Ok(value) => return Ok(value),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return Err(RecvTimeoutError::Closed),
            }
        }
    })
    .await
    .map_err(|_| RecvTimeoutError::Timeout)?
}

/// Wait for the watched value to change and return the new value
pub async fn changed_timeout<T: Clone>(
    rx: &mut watch::Receiver<T>,
    duration: Duration,
) -> Result<T, RecvTimeoutError> {
    timeout(duration, rx.changed())
        .await
        .map_err(|_| RecvTimeoutError::Timeout)?
        .map_err(|_| RecvTimeoutError::Closed)?;
    Ok(rx.borrow_and_update().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recv_timeout_success() {
        let (tx, mut rx) = broadcast::channel(4);
        tx.send(42).unwrap();
        assert_eq!(recv_timeout(&mut rx, Duration::from_millis(100)).await, Ok(42));
    }

    #[tokio::test]
    async fn test_recv_timeout_expires() {
        let (_tx, mut rx) = broadcast::channel::<i32>(4);
        let result = recv_timeout(&mut rx, Duration::from_millis(10)).await;
        assert_eq!(result, Err(RecvTimeoutError::Timeout));
    }

    #[tokio::test]
    async fn test_changed_timeout_returns_new_value() {
        let (tx, mut rx) = watch::channel(0);
        tx.send(7).unwrap();
        assert_eq!(changed_timeout(&mut rx, Duration::from_millis(100)).await, Ok(7));
    }
}
