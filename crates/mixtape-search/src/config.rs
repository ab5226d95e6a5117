use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::theme::{StyleProps, StyleSlot, Theme};
use crate::types::network::Network;
use crate::types::query::QueryOptions;

/// Host-supplied widget configuration. Field names match the widget props.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    /// Network key; missing or unknown keys mean Ethereum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_network: Option<String>,

    #[serde(flatten)]
    pub query: QueryOptions,

    /// `"dark"` enables the dark palette.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default)]
    pub style: BTreeMap<StyleSlot, StyleProps>,

    #[serde(default)]
    pub class_names: BTreeMap<StyleSlot, String>,
}

impl SearchConfig {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn network(&self) -> Network {
        Network::from_key(self.active_network.as_deref())
    }

    pub fn theme(&self) -> Theme {
        Theme::from_key(self.theme.as_deref())
    }
}
