use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{rating_store::RatingStore, storage::StorageError},
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_RECONNECT_ATTEMPTS: u32 = 3;

fn next_delay(current: Duration) -> Duration {
    (current * 2).min(MAX_DELAY)
}

/// Keep a remote rating store connected, flipping the shared state into degraded mode
/// while it is unreachable.
///
/// Never returns: after exhausting in-place reconnect attempts the store is dropped and
/// a fresh connection is established through `connect`.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn RatingStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        match connect().await {
            Ok(store) => {
                state.install_rating_store(store.clone()).await;
                info!("rating store connected; leaving degraded mode");
                delay = INITIAL_DELAY;

                supervise(&state, store.as_ref()).await;

                state.clear_rating_store().await;
                sleep(delay).await;
                delay = next_delay(delay);
            }
            Err(err) => {
                warn!(error = %err, "rating store connection attempt failed");
                sleep(delay).await;
                delay = next_delay(delay);
            }
        }
    }
}

/// Poll the store until it fails and cannot be revived in place.
async fn supervise(state: &SharedState, store: &dyn RatingStore) {
    loop {
        if store.health_check().await.is_ok() {
            if state.is_degraded().await {
                info!("rating store healthy again; leaving degraded mode");
                state.update_degraded(false);
            }
            sleep(HEALTH_POLL_INTERVAL).await;
            continue;
        }

        let mut reconnect_delay = INITIAL_DELAY;
        let mut reconnected = false;
        for attempt in 0..MAX_RECONNECT_ATTEMPTS {
            match store.try_reconnect().await {
                Ok(()) => {
                    info!(attempt, "rating store reconnected after health check failure");
                    reconnected = true;
                    break;
                }
                Err(err) => {
                    if attempt == 0 {
                        warn!(
                            attempt, error = %err,
                            "rating store reconnect failed; entering degraded mode"
                        );
                        state.update_degraded(true);
                    } else {
                        warn!(attempt, error = %err, "rating store reconnect attempt failed");
                    }
                    sleep(reconnect_delay).await;
                    reconnect_delay = next_delay(reconnect_delay);
                }
            }
        }

        if !reconnected {
            warn!("exhausted rating store reconnect attempts; staying in degraded mode");
            return;
        }
        state.update_degraded(false);
        sleep(HEALTH_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, dao::rating_store::memory::MemoryRatingStore, state::AppState};

    #[test]
    fn delay_doubles_until_cap() {
        assert_eq!(next_delay(Duration::from_secs(1)), Duration::from_secs(2));
        assert_eq!(next_delay(Duration::from_secs(8)), MAX_DELAY);
    }

    #[tokio::test]
    async fn installs_store_once_connected() {
        let state = AppState::new(AppConfig::default());
        let mut watcher = state.degraded_watcher();
        assert!(*watcher.borrow());

        let supervisor = tokio::spawn(run(state.clone(), || async {
            Ok::<_, StorageError>(Arc::new(MemoryRatingStore::new()) as Arc<dyn RatingStore>)
        }));

        watcher.changed().await.unwrap();
        assert!(!*watcher.borrow());
        assert!(!state.is_degraded().await);

        supervisor.abort();
    }
}
