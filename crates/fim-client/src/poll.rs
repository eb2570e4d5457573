// Periodic re-fetch (used for draft picks).

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Spawn [`poll`] on the runtime. A zero interval disables polling and
/// returns `None`.
pub fn spawn_poller<M, F, Fut>(every: Duration, tx: mpsc::Sender<M>, fetch: F) -> Option<JoinHandle<()>>
where
    M: Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = M> + Send + 'static,
{
    if every.is_zero() {
        return None;
    }
    Some(tokio::spawn(poll(every, tx, fetch)))
}

/// Call `fetch` once per interval and forward each result on `tx`.
///
/// The first fetch happens one full interval after start; the caller has
/// already loaded the initial value. Returns when the receiver is dropped.
pub async fn poll<M, F, Fut>(every: Duration, tx: mpsc::Sender<M>, mut fetch: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = M>,
{
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let message = fetch().await;
        if tx.send(message).await.is_err() {
            debug!("poll receiver dropped, stopping");
            return;
        }
    }
}
