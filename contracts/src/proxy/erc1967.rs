//! The [ERC-1967] implementation slot, the `Upgraded` event and a proxy
//! contract built on them.
//!
//! The proxy is upgradeable because calls are delegated to an implementation
//! address that can be changed. That address lives at the slot specified by
//! [ERC-1967], so it never conflicts with the storage layout of the
//! implementation behind the proxy.
//!
//! [ERC-1967]: https://eips.ethereum.org/EIPS/eip-1967
use alloc::vec::Vec;

use alloy_primitives::{b256, Address, B256, U256};
pub use sol::*;
#[allow(deprecated)]
use stylus_sdk::{
    abi::Bytes, call::MethodError, evm, prelude::*, storage::StorageAddress,
    ArbResult,
};

use crate::{
    proxy::IProxy,
    utils::{
        account::AccountAccessExt,
        address,
        revert::{encode_reason, RevertReason},
        storage_slot::StorageSlot,
    },
};

/// Storage slot with the address of the current implementation.
/// This is the keccak-256 hash of "eip1967.proxy.implementation" subtracted
/// by 1.
pub const IMPLEMENTATION_SLOT: B256 = b256!(
    "0x360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc"
);

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Emitted when the implementation is upgraded.
        ///
        /// * `implementation` - Address of the new implementation.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event Upgraded(address indexed implementation);
    }
}

/// An [`Erc1967Utils`] or [`Erc1967Proxy`] error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The new implementation is not a valid contract address.
    InvalidImplementation,
    /// The setup call into the implementation reverted with the contained
    /// data.
    FailedCall(Vec<u8>),
}

impl RevertReason for Error {
    fn reason(&self) -> &'static str {
        match self {
            Error::InvalidImplementation => {
                "ERC1967: new implementation is not a contract"
            }
            Error::FailedCall(_) => "Address: low-level delegate call failed",
        }
    }
}

impl From<Error> for Vec<u8> {
    fn from(e: Error) -> Self {
        match e {
            Error::FailedCall(data) if !data.is_empty() => data,
            e => encode_reason(e.reason()),
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
impl MethodError for Error {
    fn encode(self) -> Vec<u8> {
        self.into()
    }
}

/// Getters and event emitting update functions for the ERC-1967
/// implementation slot.
#[storage]
pub struct Erc1967Utils {
    storage_slot: StorageSlot,
}

impl Erc1967Utils {
    /// Returns the current implementation address.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    pub fn get_implementation(&self) -> Address {
        self.implementation_slot().get()
    }

    /// Stores `new_implementation` in the implementation slot and emits
    /// [`Upgraded`].
    ///
    /// Any setup call has to be performed by the caller afterwards, since it
    /// requires the top level storage of the proxy.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `new_implementation` - The new implementation address.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidImplementation`] - If `new_implementation` has no
    ///   code.
    ///
    /// # Events
    ///
    /// * [`Upgraded`].
    #[allow(deprecated)]
    pub fn upgrade_to(
        &mut self,
        new_implementation: Address,
    ) -> Result<(), Error> {
        if !self.vm().has_code(new_implementation) {
            return Err(Error::InvalidImplementation);
        }

        self.implementation_slot().set(new_implementation);
        evm::log(Upgraded { implementation: new_implementation });

        Ok(())
    }

    fn implementation_slot(&self) -> StorageAddress {
        self.storage_slot.get_slot::<StorageAddress>(U256::from_be_bytes(
            IMPLEMENTATION_SLOT.0,
        ))
    }
}

/// State of an [`Erc1967Proxy`].
///
/// The proxy declares no sequential storage of its own, so the whole
/// layout starting at slot zero belongs to the implementation.
#[storage]
pub struct Erc1967Proxy {
    erc1967: Erc1967Utils,
}

/// NOTE: Implementation of [`TopLevelStorage`] to be able use `&mut self` when
/// delegating calls.
unsafe impl TopLevelStorage for Erc1967Proxy {}

#[public]
impl Erc1967Proxy {
    /// Initializes the upgradeable proxy with an initial implementation
    /// specified by `implementation`.
    ///
    /// If `data` is nonempty, it's used as data in a delegate call to
    /// `implementation`. This will typically be an encoded function call, and
    /// allows initializing the storage of the proxy like a Solidity
    /// constructor.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `implementation` - Address of the implementation contract.
    /// * `data` - Encoded initializer call, or empty.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidImplementation`] - If `implementation` has no code.
    /// * [`Error::FailedCall`] - If the initializer call reverted.
    ///
    /// # Events
    ///
    /// * [`Upgraded`].
    #[constructor]
    pub fn constructor(
        &mut self,
        implementation: Address,
        data: Bytes,
    ) -> Result<(), Error> {
        self.erc1967.upgrade_to(implementation)?;

        if !data.is_empty() {
            address::function_delegate_call(self, implementation, &data)
                .map_err(Error::FailedCall)?;
        }

        Ok(())
    }

    /// Returns the current implementation address.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    pub fn implementation(&self) -> Address {
        self.erc1967.get_implementation()
    }

    /// Delegates every unknown call to the current implementation.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `calldata` - The calldata to delegate.
    ///
    /// # Errors
    ///
    /// * The raw revert data of the implementation, if it reverted.
    #[fallback]
    pub fn fallback(&mut self, calldata: &[u8]) -> ArbResult {
        self.do_fallback(calldata)
    }
}

impl IProxy for Erc1967Proxy {
    fn implementation(&self) -> Address {
        self.erc1967.get_implementation()
    }
}
