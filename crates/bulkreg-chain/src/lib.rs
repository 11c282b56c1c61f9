//! Chain access for bulkreg
//!
//! This crate wraps the two contracts a registration touches, the
//! registrar controller and the public resolver, behind small traits so the
//! batch logic can run against a live node or a test double.
//!
//! # Example
//!
//! ```rust,no_run
//! use bulkreg_chain::{connect, namehash, ChainSettings, Registrar};
//!
//! async fn probe(settings: ChainSettings) -> Result<(), Box<dyn std::error::Error>> {
//!     let chain = connect(&settings).await?;
//!     println!("registrar owner: {}", chain.registrar.owner().await?);
//!     println!("node: {}", namehash("alice.example.eth"));
//!     Ok(())
//! }
//! ```

mod client;
mod contracts;
mod deployment;
mod error;
mod namehash;
mod network;
mod registrar;
mod revert;

// Re-export main types
pub use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
pub use client::{connect, AlloyRegistrar, AlloyResolver, Chain, ChainSettings, SignerKeys};
pub use deployment::{AbiLoadError, ContractKind, Deployment};
pub use error::ChainError;
pub use namehash::namehash;
pub use network::Network;
pub use registrar::{PendingRegistration, Receipt, Registrar, Registration, Resolver};
pub use revert::decode_revert_reason;
