use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Coalesce a burst of events into one delivery after a quiet period.
///
/// Each incoming event replaces the pending one and restarts the clock; the
/// latest event is forwarded once `quiet` elapses with nothing new. This is
/// the timer-with-cancel primitive behind the mutation watcher: a page
/// re-render produces dozens of mutation callbacks, and the downstream
/// evaluation pass must run at most once per burst.
///
/// If the source never fires, nothing is ever delivered; reinitialization on
/// navigation is the caller's concern.
pub async fn debounce<T>(mut rx: mpsc::Receiver<T>, quiet: Duration, tx: mpsc::Sender<T>) {
    let mut pending: Option<T> = None;
    loop {
        match pending.take() {
            None => match rx.recv().await {
                Some(ev) => pending = Some(ev),
                None => return,
            },
            Some(ev) => match timeout(quiet, rx.recv()).await {
                // Burst continues; keep only the newest and restart the clock.
                Ok(Some(next)) => pending = Some(next),
                // Source closed; flush what we have.
                Ok(None) => {
                    let _ = tx.send(ev).await;
                    return;
                }
                Err(_) => {
                    if tx.send(ev).await.is_err() {
                        return;
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn burst_collapses_to_latest_event() {
        let (in_tx, in_rx) = mpsc::channel(32);
        let (out_tx, mut out_rx) = mpsc::channel(32);
        tokio::spawn(debounce(in_rx, Duration::from_millis(50), out_tx));

        for i in 0..5 {
            in_tx.send(i).await.unwrap();
            sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(out_rx.recv().await, Some(4));

        // Nothing further pending.
        drop(in_tx);
        assert_eq!(out_rx.recv().await, None);
    }

    #[tokio::test]
    async fn separate_bursts_each_deliver() {
        let (in_tx, in_rx) = mpsc::channel(32);
        let (out_tx, mut out_rx) = mpsc::channel(32);
        tokio::spawn(debounce(in_rx, Duration::from_millis(20), out_tx));

        in_tx.send("a").await.unwrap();
        sleep(Duration::from_millis(80)).await;
        in_tx.send("b").await.unwrap();

        assert_eq!(out_rx.recv().await, Some("a"));
        assert_eq!(out_rx.recv().await, Some("b"));
    }

    #[tokio::test]
    async fn close_flushes_pending_event() {
        let (in_tx, in_rx) = mpsc::channel(32);
        let (out_tx, mut out_rx) = mpsc::channel(32);
        tokio::spawn(debounce(in_rx, Duration::from_secs(3600), out_tx));

        in_tx.send(1).await.unwrap();
        drop(in_tx);
        assert_eq!(out_rx.recv().await, Some(1));
        assert_eq!(out_rx.recv().await, None);
    }
}
