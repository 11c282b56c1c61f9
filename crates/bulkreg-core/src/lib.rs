//! bulkreg core types
//!
//! This crate holds everything about the registration batch that does not
//! talk to a chain:
//! - Tracking records and their status
//! - The progress file (record store)
//! - CSV candidate input
//! - Reconciliation of candidates into the store

pub mod error;
pub mod input;
pub mod reconcile;
pub mod record;
pub mod status;
pub mod store;

// Re-export commonly used types
pub use error::{InputError, StoreError};
pub use input::{read_candidates, Candidate, CandidateReader};
pub use reconcile::{reconcile, OwnerConflict, ReconcileReport};
pub use record::{Records, TrackingRecord};
pub use status::DomainStatus;
pub use store::RecordStore;
