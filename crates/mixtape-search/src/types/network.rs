use std::fmt;

use serde::{Deserialize, Serialize};

/// Blockchain network selecting the collection directory and display icon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Ethereum,
    Polygon,
    Fantom,
    Avalanche,
}

const DIRECTORY_BASE: &str = "https://lib.locatia.app";
const ETH_ICON: &str =
    "https://bafybeie3c5fcqjhrfma6wljpwzzldpsttu2lonutagoxwikeslersqzdwe.ipfs.dweb.link/eth.png";
const ICON_GATEWAY: &str =
    "https://bafybeigzgztdmt3qdt52wuhyrrvpqp5qt4t2uja23wmfhsccqt332ek7da.ipfs.dweb.link";

impl Network {
    pub const ALL: [Network; 4] = [
        Network::Ethereum,
        Network::Polygon,
        Network::Fantom,
        Network::Avalanche,
    ];

    /// Wire key, as passed to the NFT fetcher and accepted in config.
    pub fn key(&self) -> &'static str {
        match self {
            Network::Ethereum => "ethereum",
            Network::Polygon => "polygon",
            Network::Fantom => "fantom",
            Network::Avalanche => "avalanche",
        }
    }

    /// Resolve a network key, falling back to Ethereum when the key is
    /// missing or not recognized.
    pub fn from_key(key: Option<&str>) -> Self {
        match key {
            Some("polygon") => Network::Polygon,
            Some("fantom") => Network::Fantom,
            Some("avalanche") => Network::Avalanche,
            _ => Network::Ethereum,
        }
    }

    /// Remote JSON directory listing this network's known collections.
    pub fn directory_url(&self) -> String {
        let dir = match self {
            Network::Ethereum => "eth-directory",
            Network::Polygon => "poly-directory",
            Network::Fantom => "ftm-directory",
            Network::Avalanche => "avax-directory",
        };
        format!("{DIRECTORY_BASE}/{dir}/directory.json")
    }

    pub fn icon_url(&self) -> String {
        match self {
            Network::Ethereum => ETH_ICON.to_string(),
            Network::Polygon => format!("{ICON_GATEWAY}/polygon/512.png"),
            Network::Fantom => format!("{ICON_GATEWAY}/fantom/512.png"),
            Network::Avalanche => format!("{ICON_GATEWAY}/avalanche/512.png"),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
