//! Supported networks.

use std::fmt;
use std::str::FromStr;

/// Network a run targets. Selects deployment metadata and the RPC endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Network {
    /// Local development node.
    #[default]
    Localhost,
    /// Linea Sepolia testnet.
    LineaSepolia,
    /// Linea mainnet.
    Mainnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Localhost => "localhost",
            Self::LineaSepolia => "linea-sepolia",
            Self::Mainnet => "mainnet",
        }
    }

    /// Directory name under the deployments root.
    pub fn deployments_dir(&self) -> &'static str {
        match self {
            Self::Localhost => "localhost",
            Self::LineaSepolia => "LineaSepolia",
            Self::Mainnet => "mainnet",
        }
    }

    /// Whether an Infura key and private keys are needed to reach it.
    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::Localhost)
    }

    /// Default RPC endpoint. Remote networks need an Infura API key.
    pub fn rpc_url(&self, infura_api_key: Option<&str>) -> Option<String> {
        match self {
            Self::Localhost => Some("http://localhost:8545".to_string()),
            Self::LineaSepolia => {
                infura_api_key.map(|key| format!("https://linea-sepolia.infura.io/v3/{key}"))
            }
            Self::Mainnet => {
                infura_api_key.map(|key| format!("https://linea-mainnet.infura.io/v3/{key}"))
            }
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "localhost" | "hardhat" => Ok(Self::Localhost),
            "linea-sepolia" | "lineaSepolia" => Ok(Self::LineaSepolia),
            "mainnet" | "linea-mainnet" => Ok(Self::Mainnet),
            other => Err(format!(
                "unknown network '{other}' (expected localhost, linea-sepolia or mainnet)"
            )),
        }
    }
}
