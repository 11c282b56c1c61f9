//! Registration of a single domain.
//!
//! One call of [`RegistrationExecutor::register`] estimates gas, submits an
//! `ownerRegister` transaction and waits for it to be mined. Every failure
//! is folded into [`Outcome::Failed`]; nothing here aborts the batch.
//!
//! Registration is not atomic with bookkeeping. If the process dies after a
//! transaction is mined but before the caller persists `Success`, the next run
//! submits the same registration again. The registrar is expected to reject an
//! already registered name, so the domain then shows up as `Failed` with an
//! "unavailable" revert reason and `tx_hash` of the earlier attempt is lost.
//! This depends on the registrar contract and has not been verified here.

use std::sync::Arc;

use bulkreg_chain::{
    decode_revert_reason, namehash, Address, ChainError, Receipt, Registrar, Registration,
    Resolver, U256,
};
use bulkreg_core::TrackingRecord;
use thiserror::Error;
use tracing::{debug, error, info};

/// Registration period: 99 years.
pub const DURATION_SECS: u64 = 365 * 99 * 24 * 60 * 60;

/// Fuses burned on registration. Zero leaves the name unrestricted.
pub const OWNER_CONTROLLED_FUSES: u16 = 0;

/// Point the owner's reverse record at the new name.
pub const REVERSE_RECORD: bool = true;

/// Errors from one registration attempt.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("invalid owner address '{owner}': {message}")]
    InvalidOwner { owner: String, message: String },

    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Result of one registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success {
        tx_hash: String,
    },
    Failed {
        error: String,
        /// Set when the transaction was submitted before failing.
        tx_hash: Option<String>,
    },
}

impl Outcome {
    /// Record this outcome on the tracking record.
    pub fn apply_to(&self, record: &mut TrackingRecord) {
        match self {
            Self::Success { tx_hash } => record.succeed(Some(tx_hash.clone())),
            Self::Failed { error, tx_hash } => record.fail(error.clone(), tx_hash.clone()),
        }
    }
}

/// Registers domains under `<base_domain>.eth`.
pub struct RegistrationExecutor {
    registrar: Arc<dyn Registrar>,
    resolver: Arc<dyn Resolver>,
    parent: String,
}

impl RegistrationExecutor {
    pub fn new(
        registrar: Arc<dyn Registrar>,
        resolver: Arc<dyn Resolver>,
        base_domain: &str,
    ) -> Self {
        Self {
            registrar,
            resolver,
            parent: format!("{base_domain}.eth"),
        }
    }

    /// Fully qualified name of `domain`.
    pub fn full_name(&self, domain: &str) -> String {
        format!("{domain}.{}", self.parent)
    }

    /// Build the `ownerRegister` arguments for `domain`.
    pub fn build_registration(
        &self,
        domain: &str,
        owner: &str,
    ) -> Result<Registration, ExecutorError> {
        let owner_address = owner
            .parse::<Address>()
            .map_err(|e| ExecutorError::InvalidOwner {
                owner: owner.to_string(),
                message: e.to_string(),
            })?;

        // The controller hashes the label as given; namehash lowercases it.
        let label = domain.to_lowercase();
        let node = namehash(&self.full_name(&label));
        let set_addr = self.resolver.encode_set_addr(node, owner_address);

        Ok(Registration {
            name: label,
            owner: owner_address,
            duration: U256::from(DURATION_SECS),
            resolver: self.resolver.address(),
            data: vec![set_addr],
            owner_controlled_fuses: OWNER_CONTROLLED_FUSES,
            reverse_record: REVERSE_RECORD,
        })
    }

    /// Register `domain` to `owner` and wait for confirmation.
    pub async fn register(&self, domain: &str, owner: &str) -> Outcome {
        match self.try_register(domain, owner).await {
            Ok(receipt) => {
                info!(
                    domain = %domain,
                    tx_hash = %receipt.tx_hash,
                    block = ?receipt.block_number,
                    gas_used = receipt.gas_used,
                    "Domain registered successfully"
                );
                Outcome::Success {
                    tx_hash: receipt.tx_hash.to_string(),
                }
            }
            Err(e) => {
                error!(domain = %domain, error = %e, "Failed to register domain");

                let reason = match &e {
                    ExecutorError::Chain(chain) => {
                        chain.revert_data().and_then(decode_revert_reason)
                    }
                    ExecutorError::InvalidOwner { .. } => None,
                };
                let error = match reason {
                    Some(reason) => {
                        error!(domain = %domain, reason = %reason, "Revert reason");
                        format!("{e} (revert reason: {reason})")
                    }
                    None => e.to_string(),
                };

                let tx_hash = match &e {
                    ExecutorError::Chain(chain) => chain.tx_hash().map(str::to_owned),
                    ExecutorError::InvalidOwner { .. } => None,
                };
                Outcome::Failed { error, tx_hash }
            }
        }
    }

    async fn try_register(&self, domain: &str, owner: &str) -> Result<Receipt, ExecutorError> {
        let registration = self.build_registration(domain, owner)?;
        debug!(domain = %domain, data = ?registration.data, "Resolver data");

        let gas_limit = self
            .registrar
            .estimate_registration(&registration)
            .await?;
        info!(domain = %domain, gas_limit, "Estimated gas limit");

        let pending = self
            .registrar
            .submit_registration(&registration, gas_limit)
            .await?;
        info!(domain = %domain, tx_hash = %pending.tx_hash(), "Waiting for confirmation");

        Ok(pending.wait().await?)
    }
}
