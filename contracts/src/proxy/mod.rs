//! Proxy contracts and the upgradeability building blocks for UUPS
//! implementations.
//!
//! A proxy keeps all state at its own, immutable address and forwards every
//! call to a replaceable implementation contract with `delegatecall`.
use alloc::vec::Vec;

use alloy_primitives::Address;
use stylus_sdk::prelude::*;

use crate::utils::address;

pub mod erc1967;
pub mod utils;

/// Delegates all calls to another contract using the EVM instruction
/// `delegatecall`. The second contract is the _implementation_ behind the
/// proxy, returned by [`IProxy::implementation`].
///
/// The success and return data of the delegated call are returned back to
/// the caller of the proxy unchanged, reverts included.
pub trait IProxy: TopLevelStorage + Sized {
    /// Delegates `calldata` to `implementation`.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `implementation` - The address of the implementation contract.
    /// * `calldata` - The calldata to delegate to the implementation contract.
    ///
    /// # Errors
    ///
    /// * The raw revert data of the implementation, if it reverted.
    fn delegate(
        &mut self,
        implementation: Address,
        calldata: &[u8],
    ) -> Result<Vec<u8>, Vec<u8>> {
        address::function_delegate_call(self, implementation, calldata)
    }

    /// Returns the address to which the fallback function should delegate.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    fn implementation(&self) -> Address;

    /// Delegates the current call to [`IProxy::implementation`]. Meant to be
    /// called from a `#[fallback]` function, so that every selector the proxy
    /// does not know runs against the implementation.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `calldata` - The calldata to delegate to the implementation contract.
    ///
    /// # Errors
    ///
    /// * The raw revert data of the implementation, if it reverted.
    fn do_fallback(&mut self, calldata: &[u8]) -> Result<Vec<u8>, Vec<u8>> {
        self.delegate(self.implementation(), calldata)
    }
}
