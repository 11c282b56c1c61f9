//! Registrar and resolver seams.

use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use async_trait::async_trait;

use crate::ChainError;

/// Arguments of one `ownerRegister` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Label to register under the parent name.
    pub name: String,
    pub owner: Address,
    /// Registration period in seconds.
    pub duration: U256,
    pub resolver: Address,
    /// Encoded resolver calls applied on registration.
    pub data: Vec<Bytes>,
    pub owner_controlled_fuses: u16,
    pub reverse_record: bool,
}

/// Mined registration transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// The registrar controller contract.
#[async_trait]
pub trait Registrar: Send + Sync {
    /// Deployed contract address.
    fn address(&self) -> Address;

    /// Current owner of the controller.
    async fn owner(&self) -> Result<Address, ChainError>;

    /// Estimate gas for a registration.
    async fn estimate_registration(&self, registration: &Registration) -> Result<u64, ChainError>;

    /// Submit a registration with the given gas limit.
    async fn submit_registration(
        &self,
        registration: &Registration,
        gas_limit: u64,
    ) -> Result<Box<dyn PendingRegistration>, ChainError>;
}

/// A submitted registration awaiting confirmation.
#[async_trait]
pub trait PendingRegistration: Send {
    fn tx_hash(&self) -> TxHash;

    /// Wait until the transaction is mined. A reverted receipt is an error.
    async fn wait(self: Box<Self>) -> Result<Receipt, ChainError>;
}

/// The resolver contract.
pub trait Resolver: Send + Sync {
    /// Deployed contract address.
    fn address(&self) -> Address;

    /// Encode `setAddr(bytes32,address)` call data.
    fn encode_set_addr(&self, node: B256, addr: Address) -> Bytes;
}
