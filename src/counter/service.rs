//! Counter update protocol.

use std::sync::Arc;

use crate::counter::store::CounterStore;
use crate::counter::types::{Action, CounterError, CounterState, StoreError};
use crate::observability::metrics;

/// Applies increments to the single counter aggregate.
///
/// Holds no mutable state of its own; every call is atomic at the store.
#[derive(Clone)]
pub struct CounterService {
    store: Arc<dyn CounterStore>,
    key: String,
}

impl CounterService {
    pub fn new(store: Arc<dyn CounterStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Add one unit to the field selected by `action` and return the full
    /// aggregate.
    ///
    /// The add is issued exactly once. If it succeeds and the read-back
    /// fails, the error is reported as [`CounterError::ReadBack`] and the add
    /// is not repeated.
    pub async fn increment(&self, action: Action) -> Result<CounterState, CounterError> {
        let new_value = self
            .store
            .atomic_add(&self.key, action.field(), 1)
            .await
            .map_err(CounterError::Apply)?;
        metrics::record_increment(action);

        tracing::debug!(key = %self.key, action = %action, new_value, "Increment applied");

        let state = self.read().await.map_err(|e| {
            tracing::warn!(key = %self.key, action = %action, error = %e, "Read-back failed after applied increment");
            CounterError::ReadBack(e)
        })?;

        Ok(state)
    }

    /// Current aggregate without mutating it.
    pub async fn snapshot(&self) -> Result<CounterState, CounterError> {
        self.read().await.map_err(CounterError::ReadBack)
    }

    async fn read(&self) -> Result<CounterState, StoreError> {
        match self.store.get(&self.key).await? {
            Some(item) => CounterState::from_item(&item),
            None => Ok(CounterState::default()),
        }
    }
}
