//! Revert payloads in the `Error(string)` format.
//!
//! Every error in this crate reverts with a fixed human-readable reason, the
//! way `require(condition, "reason")` does in Solidity, so off-chain tooling
//! can match on the message alone.
use alloc::{string::String, vec::Vec};

use alloy_sol_types::{Revert, SolError};

/// An error that reverts with a fixed reason string.
pub trait RevertReason {
    /// The reason string carried by the `Error(string)` payload.
    fn reason(&self) -> &'static str;
}

/// Encodes `reason` as an ABI `Error(string)` revert payload.
#[must_use]
pub fn encode_reason(reason: &str) -> Vec<u8> {
    Revert { reason: String::from(reason) }.abi_encode()
}
