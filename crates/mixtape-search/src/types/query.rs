use serde::{Deserialize, Serialize};

/// Query options forwarded untouched to the NFT fetcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,

    /// Filter clauses.
    #[serde(rename = "where")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_clauses: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,

    /// Alternative index database endpoint.
    #[serde(rename = "dbURL")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_url: Option<String>,
}
