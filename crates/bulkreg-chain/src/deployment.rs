//! Deployment metadata for the registrar and resolver.
//!
//! Each network directory holds one JSON file per contract with the
//! deployed `address` and its `abi`, as written by the deploy scripts.

use std::fs;
use std::path::{Path, PathBuf};

use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::contracts::{IAddrResolver, IRegistrarController};
use crate::Network;

/// Errors loading deployment metadata.
#[derive(Debug, Error)]
pub enum AbiLoadError {
    /// File missing or unreadable.
    #[error("failed to read deployment {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not a `{ address, abi }` document.
    #[error("invalid deployment {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// ABI does not declare the function bulkreg calls.
    #[error("deployment {path} has no {signature} function")]
    MissingFunction {
        path: PathBuf,
        signature: &'static str,
    },
}

/// Contracts bulkreg needs on every network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractKind {
    RegistrarController,
    PublicResolver,
}

impl ContractKind {
    fn file_name(&self) -> &'static str {
        match self {
            Self::RegistrarController => "ETHRegistrarController.json",
            Self::PublicResolver => "PublicResolver.json",
        }
    }

    /// Function that must be present in the ABI, by name, signature and selector.
    fn required_function(&self) -> (&'static str, &'static str, [u8; 4]) {
        match self {
            Self::RegistrarController => (
                "ownerRegister",
                IRegistrarController::ownerRegisterCall::SIGNATURE,
                IRegistrarController::ownerRegisterCall::SELECTOR,
            ),
            Self::PublicResolver => (
                "setAddr",
                IAddrResolver::setAddrCall::SIGNATURE,
                IAddrResolver::setAddrCall::SELECTOR,
            ),
        }
    }
}

#[derive(Deserialize)]
struct DeploymentFile {
    address: Address,
    abi: JsonAbi,
}

/// A deployed contract.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub kind: ContractKind,
    pub address: Address,
    pub path: PathBuf,
}

impl Deployment {
    /// Load `<root>/<network dir>/<Contract>.json` and check its ABI.
    pub fn load(root: &Path, network: Network, kind: ContractKind) -> Result<Self, AbiLoadError> {
        let path = root.join(network.deployments_dir()).join(kind.file_name());
        Self::from_file(&path, kind)
    }

    /// Load a single deployment file and check its ABI.
    pub fn from_file(path: &Path, kind: ContractKind) -> Result<Self, AbiLoadError> {
        let contents = fs::read_to_string(path).map_err(|source| AbiLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: DeploymentFile =
            serde_json::from_str(&contents).map_err(|source| AbiLoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let (name, signature, selector) = kind.required_function();
        let declared = file
            .abi
            .function(name)
            .is_some_and(|overloads| overloads.iter().any(|f| f.selector().0 == selector));
        if !declared {
            return Err(AbiLoadError::MissingFunction {
                path: path.to_path_buf(),
                signature,
            });
        }

        debug!(path = %path.display(), address = %file.address, "Loaded deployment");
        Ok(Self {
            kind,
            address: file.address,
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const REGISTRAR_ABI: &str = r#"[
        {"type": "function", "name": "owner", "inputs": [],
         "outputs": [{"name": "", "type": "address"}], "stateMutability": "view"},
        {"type": "function", "name": "ownerRegister", "inputs": [
            {"name": "name", "type": "string"},
            {"name": "owner", "type": "address"},
            {"name": "duration", "type": "uint256"},
            {"name": "resolver", "type": "address"},
            {"name": "data", "type": "bytes[]"},
            {"name": "ownerControlledFuses", "type": "uint16"},
            {"name": "reverseRecord", "type": "bool"}
        ], "outputs": [], "stateMutability": "nonpayable"}
    ]"#;

    const RESOLVER_ABI: &str = r#"[
        {"type": "function", "name": "setAddr", "inputs": [
            {"name": "node", "type": "bytes32"},
            {"name": "coinType", "type": "uint256"},
            {"name": "a", "type": "bytes"}
        ], "outputs": [], "stateMutability": "nonpayable"},
        {"type": "function", "name": "setAddr", "inputs": [
            {"name": "node", "type": "bytes32"},
            {"name": "a", "type": "address"}
        ], "outputs": [], "stateMutability": "nonpayable"}
    ]"#;

    fn write_deployment(root: &Path, dir: &str, file: &str, abi: &str) {
        let dir = root.join(dir);
        fs::create_dir_all(&dir).unwrap();
        let json = format!(
            r#"{{"address": "0x5FbDB2315678afecb367f032d93F642f64180aa3", "abi": {abi}}}"#
        );
        fs::write(dir.join(file), json).unwrap();
    }

    #[test]
    fn test_load_registrar() {
        let root = tempfile::tempdir().unwrap();
        write_deployment(
            root.path(),
            "LineaSepolia",
            "ETHRegistrarController.json",
            REGISTRAR_ABI,
        );

        let deployment = Deployment::load(
            root.path(),
            Network::LineaSepolia,
            ContractKind::RegistrarController,
        )
        .unwrap();
        assert_eq!(
            deployment.address,
            address!("5FbDB2315678afecb367f032d93F642f64180aa3")
        );
    }

    #[test]
    fn test_load_resolver_with_overloads() {
        let root = tempfile::tempdir().unwrap();
        write_deployment(root.path(), "localhost", "PublicResolver.json", RESOLVER_ABI);

        let deployment =
            Deployment::load(root.path(), Network::Localhost, ContractKind::PublicResolver);
        assert!(deployment.is_ok());
    }

    #[test]
    fn test_missing_file() {
        let root = tempfile::tempdir().unwrap();
        let err = Deployment::load(root.path(), Network::Mainnet, ContractKind::PublicResolver)
            .unwrap_err();
        assert!(matches!(err, AbiLoadError::Read { .. }));
    }

    #[test]
    fn test_wrong_abi() {
        let root = tempfile::tempdir().unwrap();
        write_deployment(
            root.path(),
            "mainnet",
            "ETHRegistrarController.json",
            RESOLVER_ABI,
        );

        let err = Deployment::load(
            root.path(),
            Network::Mainnet,
            ContractKind::RegistrarController,
        )
        .unwrap_err();
        assert!(matches!(err, AbiLoadError::MissingFunction { .. }));
    }

    #[test]
    fn test_not_json() {
        let root = tempfile::tempdir().unwrap();
        write_deployment(root.path(), "mainnet", "PublicResolver.json", "nope");

        let err = Deployment::load(root.path(), Network::Mainnet, ContractKind::PublicResolver)
            .unwrap_err();
        assert!(matches!(err, AbiLoadError::Parse { .. }));
    }
}
