use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::DirectoryError;
use crate::normalize::normalize_record;
use crate::types::collection::CollectionRecord;
use crate::types::network::Network;

/// A network's normalized directory listing, cheap to hand out.
pub type Directory = Arc<Vec<CollectionRecord>>;

/// Trait for collection directory transports (HTTP, in-memory, etc.).
#[async_trait]
pub trait DirectorySource: Send + Sync {
    /// Fetch and parse the raw (not yet normalized) listing at `url`.
    async fn fetch_directory(&self, url: &str) -> Result<Vec<CollectionRecord>, DirectoryError>;
}

/// Parse a directory response body.
///
/// The body must be a JSON array. Elements that do not fit
/// [`CollectionRecord`] are dropped with a warning; the rest are kept.
pub fn parse_directory(body: &[u8]) -> Result<Vec<CollectionRecord>, DirectoryError> {
    let elements: Vec<serde_json::Value> =
        serde_json::from_slice(body).map_err(|e| DirectoryError::Parse(e.to_string()))?;

    Ok(elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| match serde_json::from_value::<CollectionRecord>(element) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed directory record");
                None
            }
        })
        .collect())
}

/// Per-network cache of normalized directory listings.
///
/// A network is present iff a fetch for it has succeeded. Entries are never
/// evicted except through [`DirectoryCache::invalidate`] or
/// [`DirectoryCache::clear`]. Concurrent misses for the same network are
/// not coalesced; each one fetches and the last write wins.
pub struct DirectoryCache {
    source: Arc<dyn DirectorySource>,
    entries: RwLock<HashMap<Network, Directory>>,
}

impl DirectoryCache {
    pub fn new(source: Arc<dyn DirectorySource>) -> Self {
        Self {
            source,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cached listing for `network`, fetching it on first use.
    ///
    /// Failures are logged and yield an empty listing; nothing is cached
    /// for the network in that case.
    pub async fn get_or_fetch(&self, network: Network) -> Directory {
        match self.try_get_or_fetch(network).await {
            Ok(directory) => directory,
            Err(e) => {
                tracing::error!(network = %network, error = %e, "Suggestions unavailable");
                Arc::new(Vec::new())
            }
        }
    }

    /// Like [`get_or_fetch`](Self::get_or_fetch) but returns the failure.
    pub async fn try_get_or_fetch(&self, network: Network) -> Result<Directory, DirectoryError> {
        if let Some(hit) = self.cached(network).await {
            tracing::debug!(network = %network, records = hit.len(), "Directory cache hit");
            return Ok(hit);
        }

        let url = network.directory_url();
        tracing::debug!(network = %network, url = %url, "Fetching collection directory");
        let raw = self.source.fetch_directory(&url).await?;
        let total = raw.len();

        let records: Vec<CollectionRecord> = raw
            .into_iter()
            .filter_map(|record| match normalize_record(record) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(network = %network, error = %e, "Dropping directory record");
                    None
                }
            })
            .collect();

        tracing::info!(
            network = %network,
            records = records.len(),
            dropped = total - records.len(),
            "Loaded collection directory"
        );

        let directory: Directory = Arc::new(records);
        self.entries
            .write()
            .await
            .insert(network, Arc::clone(&directory));
        Ok(directory)
    }

    /// Make sure `network` is loaded. Returns whether it is cached afterwards.
    pub async fn ensure_loaded(&self, network: Network) -> bool {
        if self.contains(network).await {
            return true;
        }
        self.try_get_or_fetch(network)
            .await
            .map_err(|e| tracing::error!(network = %network, error = %e, "Suggestions unavailable"))
            .is_ok()
    }

    pub async fn cached(&self, network: Network) -> Option<Directory> {
        self.entries.read().await.get(&network).cloned()
    }

    pub async fn contains(&self, network: Network) -> bool {
        self.entries.read().await.contains_key(&network)
    }

    /// Forget a network so the next lookup refetches it.
    pub async fn invalidate(&self, network: Network) -> bool {
        self.entries.write().await.remove(&network).is_some()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

/// HTTP directory source backed by `reqwest`.
#[cfg(feature = "remote-directory")]
pub struct HttpDirectorySource {
    client: reqwest::Client,
}

#[cfg(feature = "remote-directory")]
impl HttpDirectorySource {
    pub fn new() -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| DirectoryError::Transport {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[cfg(feature = "remote-directory")]
#[async_trait]
impl DirectorySource for HttpDirectorySource {
    async fn fetch_directory(&self, url: &str) -> Result<Vec<CollectionRecord>, DirectoryError> {
        let transport = |e: reqwest::Error| DirectoryError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        parse_directory(&body)
    }
}

/// In-memory directory source for testing.
///
/// Bodies are stored as raw JSON so the parse path is exercised; every
/// call is counted.
pub struct StaticDirectorySource {
    bodies: HashMap<String, String>,
    requests: AtomicUsize,
}

impl StaticDirectorySource {
    pub fn new() -> Self {
        Self {
            bodies: HashMap::new(),
            requests: AtomicUsize::new(0),
        }
    }

    /// Serve `json` for the given network's directory URL.
    pub fn insert_json(&mut self, network: Network, json: &str) {
        self.bodies.insert(network.directory_url(), json.to_string());
    }

    /// Number of fetches issued so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Default for StaticDirectorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectorySource for StaticDirectorySource {
    async fn fetch_directory(&self, url: &str) -> Result<Vec<CollectionRecord>, DirectoryError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let body = self.bodies.get(url).ok_or_else(|| DirectoryError::NotFound {
            url: url.to_string(),
        })?;
        parse_directory(body.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CID_V0: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";

    fn cache_with(source: StaticDirectorySource) -> (Arc<StaticDirectorySource>, DirectoryCache) {
        let source = Arc::new(source);
        let cache = DirectoryCache::new(source.clone());
        (source, cache)
    }

    #[tokio::test]
    async fn test_second_lookup_is_cache_hit() {
        let mut source = StaticDirectorySource::new();
        source.insert_json(Network::Ethereum, r#"[{ "name": "Apes", "contract": "0xABC" }]"#);
        let (source, cache) = cache_with(source);

        let first = cache.get_or_fetch(Network::Ethereum).await;
        let second = cache.get_or_fetch(Network::Ethereum).await;

        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
        assert_eq!(source.request_count(), 1);
    }

    #[tokio::test]
    async fn test_networks_cached_independently() {
        let mut source = StaticDirectorySource::new();
        source.insert_json(Network::Ethereum, r#"[{ "name": "Apes" }]"#);
        source.insert_json(Network::Polygon, r#"[{ "name": "Aavegotchi" }, { "name": "Zed" }]"#);
        let (source, cache) = cache_with(source);

        assert_eq!(cache.get_or_fetch(Network::Polygon).await.len(), 2);
        assert_eq!(cache.get_or_fetch(Network::Ethereum).await.len(), 1);
        assert_eq!(cache.get_or_fetch(Network::Polygon).await.len(), 2);
        assert_eq!(source.request_count(), 2);
    }

    #[tokio::test]
    async fn test_records_are_normalized_on_load() {
        let mut source = StaticDirectorySource::new();
        source.insert_json(
            Network::Ethereum,
            &format!(r#"[{{ "name": "Apes", "image": "ipfs://{CID_V0}/logo.png" }}]"#),
        );
        let (_, cache) = cache_with(source);

        let directory = cache.get_or_fetch(Network::Ethereum).await;
        let image = directory[0].image.as_deref().unwrap();
        assert!(image.starts_with("https://bafy"));
        assert!(image.ends_with(".ipfs.dweb.link/logo.png"));
    }

    #[tokio::test]
    async fn test_unparseable_cid_drops_only_that_record() {
        let mut source = StaticDirectorySource::new();
        source.insert_json(
            Network::Fantom,
            r#"[
                { "name": "Broken", "image": "ipfs://bnot-base32!!/logo.png" },
                { "name": "Fine", "image": "https://example.com/fine.png" }
            ]"#,
        );
        let (_, cache) = cache_with(source);

        let directory = cache.get_or_fetch(Network::Fantom).await;
        assert_eq!(directory.len(), 1);
        assert_eq!(directory[0].name.as_deref(), Some("Fine"));
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_network_unset() {
        let (source, cache) = cache_with(StaticDirectorySource::new());

        assert!(cache.get_or_fetch(Network::Avalanche).await.is_empty());
        assert!(!cache.contains(Network::Avalanche).await);

        // Not cached, so the next lookup tries again.
        cache.get_or_fetch(Network::Avalanche).await;
        assert_eq!(source.request_count(), 2);
    }

    #[tokio::test]
    async fn test_parse_failure_surfaces_from_try_variant() {
        let mut source = StaticDirectorySource::new();
        source.insert_json(Network::Ethereum, "<html>not json</html>");
        let (_, cache) = cache_with(source);

        let result = cache.try_get_or_fetch(Network::Ethereum).await;
        assert!(matches!(result, Err(DirectoryError::Parse(_))));
        assert!(!cache.contains(Network::Ethereum).await);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let mut source = StaticDirectorySource::new();
        source.insert_json(Network::Ethereum, "[]");
        let (source, cache) = cache_with(source);

        assert!(cache.ensure_loaded(Network::Ethereum).await);
        assert!(cache.ensure_loaded(Network::Ethereum).await);
        assert_eq!(source.request_count(), 1);

        assert!(cache.invalidate(Network::Ethereum).await);
        assert!(!cache.invalidate(Network::Ethereum).await);
        cache.get_or_fetch(Network::Ethereum).await;
        assert_eq!(source.request_count(), 2);

        cache.clear().await;
        assert!(cache.cached(Network::Ethereum).await.is_none());
    }

    /// Serve one canned HTTP response on a loopback port.
    #[cfg(feature = "remote-directory")]
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}/eth-directory/directory.json")
    }

    #[cfg(feature = "remote-directory")]
    fn loopback_source() -> HttpDirectorySource {
        HttpDirectorySource {
            client: reqwest::Client::builder().no_proxy().build().unwrap(),
        }
    }

    #[cfg(feature = "remote-directory")]
    #[tokio::test]
    async fn test_http_source_parses_listing() {
        let url = serve_once("200 OK", r#"[{ "name": "Apes", "contract": "0xABC" }, 7]"#).await;
        let source = loopback_source();

        let records = source.fetch_directory(&url).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].contract.as_deref(), Some("0xABC"));
    }

    #[cfg(feature = "remote-directory")]
    #[tokio::test]
    async fn test_http_source_reports_status() {
        let url = serve_once("503 Service Unavailable", "").await;
        let source = loopback_source();

        let result = source.fetch_directory(&url).await;
        assert!(matches!(result, Err(DirectoryError::Status { status: 503, .. })));
    }

    #[cfg(feature = "remote-directory")]
    #[tokio::test]
    async fn test_http_source_rejects_non_array_body() {
        let url = serve_once("200 OK", "<html>maintenance</html>").await;
        let source = loopback_source();

        let result = source.fetch_directory(&url).await;
        assert!(matches!(result, Err(DirectoryError::Parse(_))));
    }

    #[test]
    fn test_parse_directory_optional_fields() {
        let records = parse_directory(
            br#"[
                { "name": "Apes", "contract": "0xABC", "image": "ipfs://x/logo.png", "symbol": "APE" },
                { "contract": "0xDEF" },
                { "name": null, "extra": 7 }
            ]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].symbol.as_deref(), Some("APE"));
        assert_eq!(records[1].name, None);
        assert_eq!(records[2], CollectionRecord::default());
    }

    #[test]
    fn test_parse_directory_requires_array() {
        assert!(matches!(
            parse_directory(br#"{ "name": "Apes" }"#),
            Err(DirectoryError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_directory_skips_malformed_records() {
        let records = parse_directory(
            br#"[
                { "name": "Apes", "contract": "0xABC" },
                { "name": "Odd", "symbol": 42 },
                "not an object"
            ]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("Apes"));
    }

    #[tokio::test]
    async fn test_malformed_record_does_not_block_caching() {
        let mut source = StaticDirectorySource::new();
        source.insert_json(
            Network::Ethereum,
            r#"[{ "name": "Apes", "contract": "0xABC" }, { "name": "Odd", "symbol": 42 }]"#,
        );
        let (_, cache) = cache_with(source);

        let directory = cache.get_or_fetch(Network::Ethereum).await;
        assert_eq!(directory.len(), 1);
        assert!(cache.contains(Network::Ethereum).await);
    }
}
