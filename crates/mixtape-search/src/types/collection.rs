use serde::{Deserialize, Serialize};

/// One entry of a network's collection directory.
///
/// Every field is optional in the remote listing. Only `image` is ever
/// rewritten (see [`crate::normalize`]); the rest is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Contract address, dispatched when the suggestion is picked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,

    /// Logo URL, or an `ipfs://` URI before normalization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl CollectionRecord {
    /// Display name, treating an empty name as absent.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}
