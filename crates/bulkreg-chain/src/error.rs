//! Error types for chain access.

use thiserror::Error;

/// Errors from talking to the registrar, resolver or node.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Gas estimation for the registration failed.
    #[error("gas estimation failed: {message}")]
    Estimation {
        message: String,
        revert_data: Option<Vec<u8>>,
    },

    /// The transaction could not be submitted.
    #[error("transaction submission failed: {message}")]
    Submission {
        message: String,
        revert_data: Option<Vec<u8>>,
    },

    /// Waiting for the receipt failed.
    #[error("confirmation of {tx_hash} failed: {message}")]
    Confirmation { tx_hash: String, message: String },

    /// The transaction was mined but reverted.
    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    /// A private key could not be parsed.
    #[error("invalid {which} private key: {message}")]
    InvalidKey { which: &'static str, message: String },

    /// Node connectivity or read call error.
    #[error("RPC error: {0}")]
    Rpc(String),
}

impl ChainError {
    /// Revert payload returned by the node, if any.
    pub fn revert_data(&self) -> Option<&[u8]> {
        match self {
            Self::Estimation { revert_data, .. } | Self::Submission { revert_data, .. } => {
                revert_data.as_deref()
            }
            _ => None,
        }
    }

    /// Hash of the submitted transaction, if the error happened after submission.
    pub fn tx_hash(&self) -> Option<&str> {
        match self {
            Self::Confirmation { tx_hash, .. } | Self::Reverted { tx_hash } => Some(tx_hash.as_str()),
            _ => None,
        }
    }
}
