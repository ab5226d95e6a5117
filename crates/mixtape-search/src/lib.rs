pub mod config;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod normalize;
pub mod suggest;
pub mod theme;
pub mod types;
pub mod widget;

// Re-exports for convenience
pub use config::SearchConfig;
#[cfg(feature = "remote-directory")]
pub use directory::HttpDirectorySource;
pub use directory::{Directory, DirectoryCache, DirectorySource, StaticDirectorySource};
pub use dispatch::{DispatchOutcome, NftFetcher, QueryDispatcher, SearchState};
pub use error::{DirectoryError, Error, FetchError, NormalizeError};
pub use types::collection::CollectionRecord;
pub use types::network::Network;
pub use types::query::QueryOptions;
pub use widget::MixtapeSearch;

/// Suggestions for `query` on `network`, fetching the directory through
/// `cache` if it is not loaded yet.
///
/// This is the whole read path: cache lookup, normalization on first
/// load, then name filtering.
pub async fn suggestions_for(
    cache: &DirectoryCache,
    network: Network,
    query: &str,
) -> Vec<CollectionRecord> {
    let directory = cache.get_or_fetch(network).await;
    suggest::filter_suggestions(&directory, query)
        .into_iter()
        .cloned()
        .collect()
}
