use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;

use crate::config::SearchConfig;
use crate::directory::{DirectoryCache, DirectorySource};
use crate::dispatch::{DispatchOutcome, NftFetcher, QueryDispatcher, SearchState, SharedState};
use crate::theme::{compose_class, resolve_style, StyleProps, StyleSlot};
use crate::types::collection::CollectionRecord;
use crate::types::network::Network;

/// Search widget controller.
///
/// Owns one directory cache, the transient [`SearchState`] and the
/// dispatcher. The host's rendering layer forwards input events here and
/// reads back state, suggestions and resolved styles.
pub struct MixtapeSearch {
    config: SearchConfig,
    network: Network,
    cache: DirectoryCache,
    dispatcher: QueryDispatcher,
    state: SharedState,
    alive: Arc<AtomicBool>,
}

impl MixtapeSearch {
    pub fn new(
        config: SearchConfig,
        directory: Arc<dyn DirectorySource>,
        fetcher: Arc<dyn NftFetcher>,
    ) -> Self {
        let state = SharedState::default();
        let alive = Arc::new(AtomicBool::new(true));
        Self {
            network: config.network(),
            config,
            cache: DirectoryCache::new(directory),
            dispatcher: QueryDispatcher::new(fetcher, state.clone(), alive.clone()),
            state,
            alive,
        }
    }

    /// Register the callback receiving fetched NFTs. Defaults to a no-op.
    pub fn on_nfts_fetched(mut self, callback: impl Fn(Vec<Value>) + Send + Sync + 'static) -> Self {
        self.dispatcher.set_callback(Arc::new(callback));
        self
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn state(&self) -> SearchState {
        self.state.snapshot()
    }

    pub fn cache(&self) -> &DirectoryCache {
        &self.cache
    }

    /// Load the directory for the active network.
    pub async fn mount(&self) -> bool {
        self.cache.ensure_loaded(self.network).await
    }

    /// Drop any dispatch completions that arrive from now on.
    pub fn unmount(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    pub fn on_input_change(&self, text: &str) {
        self.state.update(|s| {
            s.input = text.to_string();
            s.show_suggestions = !text.is_empty();
        });
    }

    pub fn clear(&self) {
        self.state.update(|s| {
            s.input.clear();
            s.show_suggestions = false;
        });
    }

    /// Input is disabled while a dispatch is in flight.
    pub fn input_enabled(&self) -> bool {
        !self.state.snapshot().processing
    }

    /// Visible suggestions for the current input, loading the active
    /// network's directory on first use.
    pub async fn suggestions(&self) -> Vec<CollectionRecord> {
        let state = self.state.snapshot();
        if !state.show_suggestions {
            return Vec::new();
        }
        crate::suggestions_for(&self.cache, self.network, &state.input).await
    }

    /// Enter pressed: dispatch the typed text.
    pub async fn submit(&self) -> DispatchOutcome {
        let input = self.state.snapshot().input;
        self.dispatch(&input).await
    }

    /// Suggestion clicked: dispatch its contract. Rows without a contract
    /// do nothing.
    pub async fn select_suggestion(&self, record: &CollectionRecord) -> DispatchOutcome {
        match record.contract.as_deref() {
            Some(contract) => self.dispatch(contract).await,
            None => DispatchOutcome::Skipped,
        }
    }

    pub async fn dispatch(&self, selection: &str) -> DispatchOutcome {
        self.dispatcher
            .dispatch(selection, self.network, &self.config.query)
            .await
    }

    /// Apply new props.
    ///
    /// A network change loads the new network's directory. When the network
    /// or query options changed and a query was already dispatched, it is
    /// dispatched again with the new parameters, keeping whatever the user
    /// is currently typing.
    pub async fn update_config(&mut self, config: SearchConfig) -> Option<DispatchOutcome> {
        let network = config.network();
        let network_changed = network != self.network;
        let query_changed = config.query != self.config.query;

        self.config = config;
        self.network = network;

        if network_changed {
            tracing::debug!(network = %network, "Active network changed");
            self.cache.ensure_loaded(network).await;
        }

        if !(network_changed || query_changed) {
            return None;
        }
        let last_query = self.state.snapshot().last_query?;
        Some(
            self.dispatcher
                .redispatch(&last_query, self.network, &self.config.query)
                .await,
        )
    }

    pub fn network_icon(&self) -> String {
        self.network.icon_url()
    }

    /// Ethereum uses the primary search bar; every other network the
    /// alternate one.
    pub fn search_bar_slot(&self) -> StyleSlot {
        match self.network {
            Network::Ethereum => StyleSlot::SearchBar,
            _ => StyleSlot::SearchBarMatic,
        }
    }

    pub fn style(&self, slot: StyleSlot) -> StyleProps {
        resolve_style(self.config.theme(), slot, self.config.style.get(&slot))
    }

    pub fn class_name(&self, slot: StyleSlot) -> String {
        compose_class(slot, self.config.class_names.get(&slot).map(String::as_str))
    }
}
