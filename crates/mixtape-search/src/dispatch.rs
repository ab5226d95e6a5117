use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;
use crate::types::network::Network;
use crate::types::query::QueryOptions;

/// Where users can request indexing of a missing collection.
pub const INDEXER_URL: &str = "https://indexer.locatia.app";

/// The external NFT data retrieval collaborator.
#[async_trait]
pub trait NftFetcher: Send + Sync {
    async fn fetch(
        &self,
        identifier: &str,
        network: Network,
        options: &QueryOptions,
    ) -> Result<Vec<Value>, FetchError>;
}

/// Host callback receiving the raw results of a successful dispatch.
pub type ResultCallback = Arc<dyn Fn(Vec<Value>) + Send + Sync>;

/// Transient widget state. Lives as long as the widget, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub input: String,
    pub processing: bool,
    pub show_suggestions: bool,
    /// Last selection handed to the fetcher.
    pub last_query: Option<String>,
}

/// Shared, lock-protected [`SearchState`].
#[derive(Debug, Clone, Default)]
pub struct SharedState(Arc<Mutex<SearchState>>);

impl SharedState {
    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SearchState {
        self.lock().clone()
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut SearchState) -> R) -> R {
        f(&mut self.lock())
    }
}

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Empty selection, nothing was sent.
    Skipped,
    /// Results were delivered to the callback.
    Delivered(usize),
    /// The fetcher failed; the error was logged.
    Failed,
    /// Completed after the widget was torn down; result discarded.
    Dropped,
}

/// Turns a confirmed selection into one fetcher call and routes the
/// outcome. Failures are logged, never returned.
///
/// Overlapping dispatches are not serialized: every completion clears
/// `processing`, even while another dispatch is still in flight.
pub struct QueryDispatcher {
    fetcher: Arc<dyn NftFetcher>,
    state: SharedState,
    alive: Arc<AtomicBool>,
    on_fetched: ResultCallback,
}

impl QueryDispatcher {
    pub fn new(fetcher: Arc<dyn NftFetcher>, state: SharedState, alive: Arc<AtomicBool>) -> Self {
        Self {
            fetcher,
            state,
            alive,
            on_fetched: Arc::new(|_: Vec<Value>| {}),
        }
    }

    pub fn set_callback(&mut self, callback: ResultCallback) {
        self.on_fetched = callback;
    }

    /// Dispatch a user selection. Clears the input and hides suggestions.
    pub async fn dispatch(
        &self,
        selection: &str,
        network: Network,
        options: &QueryOptions,
    ) -> DispatchOutcome {
        self.run(selection, network, options, true).await
    }

    /// Re-run a query after the network or query options changed. The
    /// user's in-progress input is left alone.
    pub async fn redispatch(
        &self,
        selection: &str,
        network: Network,
        options: &QueryOptions,
    ) -> DispatchOutcome {
        self.run(selection, network, options, false).await
    }

    async fn run(
        &self,
        selection: &str,
        network: Network,
        options: &QueryOptions,
        clear_input: bool,
    ) -> DispatchOutcome {
        if selection.is_empty() {
            return DispatchOutcome::Skipped;
        }

        self.state.update(|s| {
            s.processing = true;
            if clear_input {
                s.input.clear();
            }
            s.show_suggestions = false;
            s.last_query = Some(selection.to_string());
        });

        tracing::info!(selection = %selection, network = %network, "Fetching NFTs");
        let result = self.fetcher.fetch(selection, network, options).await;

        if !self.alive.load(Ordering::SeqCst) {
            tracing::debug!(selection = %selection, "Widget unmounted, discarding fetch result");
            return DispatchOutcome::Dropped;
        }

        let outcome = match result {
            Ok(results) => {
                let count = results.len();
                tracing::info!(selection = %selection, count, "NFTs fetched");
                (self.on_fetched)(results);
                DispatchOutcome::Delivered(count)
            }
            Err(FetchError::Typed { message }) => {
                tracing::error!(selection = %selection, "Error: {message}");
                tracing::info!(
                    indexer = INDEXER_URL,
                    "If collection is missing, submit an index request"
                );
                DispatchOutcome::Failed
            }
            Err(FetchError::Unknown(value)) => {
                tracing::error!(selection = %selection, value = %value, "Caught an unknown error");
                DispatchOutcome::Failed
            }
        };

        self.state.update(|s| s.processing = false);
        outcome
    }
}
