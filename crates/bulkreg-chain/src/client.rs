//! Alloy-backed registrar and resolver.

use alloy::contract::Error as ContractError;
use alloy::network::{Ethereum, EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, Bytes, TxHash, B256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::contracts::{IAddrResolver, IRegistrarController};
use crate::{ChainError, PendingRegistration, Receipt, Registrar, Registration, Resolver};

/// Private keys used off a local dev node.
#[derive(Clone)]
pub struct SignerKeys {
    /// Key of the account that deployed the contracts.
    pub deployer: String,
    /// Key of the registrar controller owner; signs registrations.
    pub owner: String,
}

impl std::fmt::Debug for SignerKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SignerKeys { .. }")
    }
}

/// Everything needed to reach the contracts.
#[derive(Debug, Clone)]
pub struct ChainSettings {
    pub rpc_url: String,
    /// `None` uses the node's unlocked accounts (account 0 deployer, 1 owner).
    pub signers: Option<SignerKeys>,
    pub registrar: Address,
    pub resolver: Address,
}

/// Connected contracts.
pub struct Chain {
    pub chain_id: u64,
    pub deployer: Address,
    pub sender: Address,
    pub registrar: AlloyRegistrar,
    pub resolver: AlloyResolver,
}

/// Connect to the node described by `settings`.
pub async fn connect(settings: &ChainSettings) -> Result<Chain, ChainError> {
    let url: Url = settings
        .rpc_url
        .parse()
        .map_err(|e| ChainError::Rpc(format!("invalid RPC URL: {e}")))?;

    let (provider, deployer, sender) = match &settings.signers {
        Some(keys) => {
            let deployer = parse_key("deployer", &keys.deployer)?;
            let owner = parse_key("owner", &keys.owner)?;
            let sender = owner.address();
            let provider = ProviderBuilder::new()
                .wallet(EthereumWallet::from(owner))
                .connect_http(url)
                .erased();
            (provider, deployer.address(), sender)
        }
        None => {
            let provider = ProviderBuilder::new().connect_http(url).erased();
            let accounts = provider
                .get_accounts()
                .await
                .map_err(|e| ChainError::Rpc(format!("failed to list node accounts: {e}")))?;
            match accounts.as_slice() {
                [deployer, owner, ..] => (provider, *deployer, *owner),
                _ => {
                    return Err(ChainError::Rpc(format!(
                        "node exposes {} unlocked accounts, need at least 2",
                        accounts.len()
                    )))
                }
            }
        }
    };

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ChainError::Rpc(format!("failed to read chain id: {e}")))?;

    info!(
        chain_id,
        deployer = %deployer,
        sender = %sender,
        registrar = %settings.registrar,
        resolver = %settings.resolver,
        "Connected to node"
    );

    Ok(Chain {
        chain_id,
        deployer,
        sender,
        registrar: AlloyRegistrar::new(settings.registrar, sender, provider),
        resolver: AlloyResolver::new(settings.resolver),
    })
}

fn parse_key(which: &'static str, key: &str) -> Result<PrivateKeySigner, ChainError> {
    key.trim().parse().map_err(|e| ChainError::InvalidKey {
        which,
        message: format!("{e}"),
    })
}

fn revert_bytes(err: &ContractError) -> Option<Vec<u8>> {
    err.as_revert_data().map(|data| data.to_vec())
}

/// Registrar controller reached through an alloy provider.
pub struct AlloyRegistrar {
    contract: IRegistrarController::IRegistrarControllerInstance<DynProvider>,
    sender: Address,
}

impl AlloyRegistrar {
    pub fn new(address: Address, sender: Address, provider: DynProvider) -> Self {
        Self {
            contract: IRegistrarController::new(address, provider),
            sender,
        }
    }
}

#[async_trait]
impl Registrar for AlloyRegistrar {
    fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn owner(&self) -> Result<Address, ChainError> {
        self.contract
            .owner()
            .call()
            .await
            .map_err(|e| ChainError::Rpc(format!("owner() call failed: {e}")))
    }

    async fn estimate_registration(&self, registration: &Registration) -> Result<u64, ChainError> {
        let r = registration;
        self.contract
            .ownerRegister(
                r.name.clone(),
                r.owner,
                r.duration,
                r.resolver,
                r.data.clone(),
                r.owner_controlled_fuses,
                r.reverse_record,
            )
            .from(self.sender)
            .estimate_gas()
            .await
            .map_err(|e| ChainError::Estimation {
                message: e.to_string(),
                revert_data: revert_bytes(&e),
            })
    }

    async fn submit_registration(
        &self,
        registration: &Registration,
        gas_limit: u64,
    ) -> Result<Box<dyn PendingRegistration>, ChainError> {
        let r = registration;
        let pending = self
            .contract
            .ownerRegister(
                r.name.clone(),
                r.owner,
                r.duration,
                r.resolver,
                r.data.clone(),
                r.owner_controlled_fuses,
                r.reverse_record,
            )
            .from(self.sender)
            .gas(gas_limit)
            .send()
            .await
            .map_err(|e| ChainError::Submission {
                message: e.to_string(),
                revert_data: revert_bytes(&e),
            })?;

        debug!(name = %r.name, tx_hash = %pending.tx_hash(), "Registration submitted");
        Ok(Box::new(AlloyPending { inner: pending }))
    }
}

struct AlloyPending {
    inner: PendingTransactionBuilder<Ethereum>,
}

#[async_trait]
impl PendingRegistration for AlloyPending {
    fn tx_hash(&self) -> TxHash {
        *self.inner.tx_hash()
    }

    async fn wait(self: Box<Self>) -> Result<Receipt, ChainError> {
        let tx_hash = *self.inner.tx_hash();
        let receipt = self
            .inner
            .get_receipt()
            .await
            .map_err(|e| ChainError::Confirmation {
                tx_hash: tx_hash.to_string(),
                message: e.to_string(),
            })?;

        if !receipt.status() {
            return Err(ChainError::Reverted {
                tx_hash: tx_hash.to_string(),
            });
        }

        Ok(Receipt {
            tx_hash: receipt.transaction_hash(),
            block_number: receipt.block_number(),
            gas_used: receipt.gas_used(),
        })
    }
}

/// Public resolver. Only used to encode calls, so it needs no provider.
#[derive(Debug, Clone)]
pub struct AlloyResolver {
    address: Address,
}

impl AlloyResolver {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl Resolver for AlloyResolver {
    fn address(&self) -> Address {
        self.address
    }

    fn encode_set_addr(&self, node: B256, addr: Address) -> Bytes {
        IAddrResolver::setAddrCall { node, a: addr }
            .abi_encode()
            .into()
    }
}
