use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{
    config::AppConfig, dao::rating_store::RatingStore, error::ServiceError,
    services::alerts::Alerts,
};

pub type SharedState = Arc<AppState>;

/// Central application state: the installed rating store and the runtime configuration.
///
/// Handlers never hold the store lock across a request; they clone the `Arc` out and
/// release it immediately.
pub struct AppState {
    rating_store: RwLock<Option<Arc<dyn RatingStore>>>,
    degraded: watch::Sender<bool>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] without any store installed (degraded mode).
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            rating_store: RwLock::new(None),
            degraded: degraded_tx,
            config,
        })
    }

    /// Construct a state with a store already installed.
    pub fn with_store(config: AppConfig, store: Arc<dyn RatingStore>) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(false);
        Arc::new(Self {
            rating_store: RwLock::new(Some(store)),
            degraded: degraded_tx,
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Alert header builder bound to the configured application name.
    pub fn alerts(&self) -> Alerts<'_> {
        Alerts::new(&self.config.application_name)
    }

    /// Obtain the installed store, or [`ServiceError::Degraded`] while none is usable.
    pub async fn require_rating_store(&self) -> Result<Arc<dyn RatingStore>, ServiceError> {
        if *self.degraded.borrow() {
            return Err(ServiceError::Degraded);
        }
        let guard = self.rating_store.read().await;
        guard.as_ref().cloned().ok_or(ServiceError::Degraded)
    }

    /// Install a rating store implementation and leave degraded mode.
    pub async fn install_rating_store(&self, store: Arc<dyn RatingStore>) {
        {
            let mut guard = self.rating_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current rating store and enter degraded mode.
    pub async fn clear_rating_store(&self) {
        {
            let mut guard = self.rating_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.rating_store.read().await;
        guard.is_none() || *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update the degraded flag, notifying watchers only when it changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::rating_store::memory::MemoryRatingStore;

    #[tokio::test]
    async fn new_state_starts_degraded() {
        let state = AppState::new(AppConfig::default());
        assert!(state.is_degraded().await);
        assert!(matches!(
            state.require_rating_store().await,
            Err(ServiceError::Degraded)
        ));
    }

    #[tokio::test]
    async fn installing_and_clearing_store_toggles_degraded_mode() {
        let state = AppState::new(AppConfig::default());

        state
            .install_rating_store(Arc::new(MemoryRatingStore::new()))
            .await;
        assert!(!state.is_degraded().await);
        assert!(state.require_rating_store().await.is_ok());

        state.clear_rating_store().await;
        assert!(state.is_degraded().await);
    }

    #[tokio::test]
    async fn degraded_flag_blocks_installed_store() {
        let state = AppState::with_store(AppConfig::default(), Arc::new(MemoryRatingStore::new()));
        state.update_degraded(true);
        assert!(state.require_rating_store().await.is_err());
        state.update_degraded(false);
        assert!(state.require_rating_store().await.is_ok());
    }
}
