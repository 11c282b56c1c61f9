//! ENS namehash (EIP-137).

use alloy::primitives::{keccak256, B256};

/// Compute the namehash of a dotted name.
///
/// Labels are lowercased before hashing. The empty name hashes to zero.
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }

    for label in name.rsplit('.') {
        let label_hash = keccak256(label.to_lowercase().as_bytes());
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(label_hash.as_slice());
        node = keccak256(buf);
    }
    node
}
