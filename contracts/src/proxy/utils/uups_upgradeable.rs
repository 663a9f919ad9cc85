//! Upgrade logic that lives in the implementation rather than in the proxy.
//!
//! An implementation embedding [`UUPSUpgradeable`] can move the
//! [`Erc1967Proxy`] delegating into it to a new implementation.
//!
//! A security mechanism ensures that an upgrade does not turn off
//! upgradeability accidentally: the new implementation has to answer
//! `proxiableUUID()` with the ERC-1967 implementation slot.
//!
//! Stylus has no immutable variables, so the implementation cannot remember
//! its own address the way `address private immutable __self` does in
//! Solidity. Instead, the constructor of an implementation raises a flag at
//! [`LOGIC_FLAG_SLOT`]. The constructor only ever runs against the storage of
//! the implementation itself, so the flag reads `false` for any proxy
//! delegating into it.
//!
//! [`Erc1967Proxy`]: crate::proxy::erc1967::Erc1967Proxy
use alloc::vec::Vec;

use alloy_primitives::{Address, B256, U256};
#[allow(deprecated)]
use stylus_sdk::{
    abi::Bytes,
    call::{Call, MethodError},
    prelude::*,
    storage::StorageBool,
};

use crate::{
    proxy::{
        erc1967::{self, Erc1967Utils, IMPLEMENTATION_SLOT},
        utils::erc1822::Erc1822ProxiableInterface,
    },
    utils::{
        account::AccountAccessExt,
        address,
        revert::{encode_reason, RevertReason},
        storage_slot::StorageSlot,
    },
};

/// Storage slot of the flag marking a contract as an implementation.
/// This is the keccak-256 hash of "Stylus.uups.logicFlag".
pub const LOGIC_FLAG_SLOT: B256 = B256::new(
    keccak_const::Keccak256::new().update(b"Stylus.uups.logicFlag").finalize(),
);

/// An [`UUPSUpgradeable`] error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The function must run through a proxy that has an implementation.
    NotActiveProxy,
    /// The function must not run through a delegate call.
    Delegated,
    /// The new implementation does not answer `proxiableUUID()`.
    NotUups,
    /// The new implementation answered `proxiableUUID()` with a slot other
    /// than [`IMPLEMENTATION_SLOT`].
    UnsupportedProxiableUuid(B256),
    /// The new implementation is not a valid contract address.
    InvalidImplementation,
    /// The setup call into the new implementation reverted with the
    /// contained data.
    FailedCall(Vec<u8>),
}

impl RevertReason for Error {
    fn reason(&self) -> &'static str {
        match self {
            Error::NotActiveProxy => {
                "Function must be called through active proxy"
            }
            Error::Delegated => {
                "UUPSUpgradeable: must not be called through delegatecall"
            }
            Error::NotUups => "ERC1967Upgrade: new implementation is not UUPS",
            Error::UnsupportedProxiableUuid(_) => {
                "ERC1967Upgrade: unsupported proxiableUUID"
            }
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

impl From<erc1967::Error> for Error {
    fn from(e: erc1967::Error) -> Self {
        match e {
            erc1967::Error::InvalidImplementation => {
                Error::InvalidImplementation
            }
            erc1967::Error::FailedCall(data) => Error::FailedCall(data),
        }
    }
}

/// Interface for a UUPS upgradeable contract.
///
/// Implementors must restrict both functions to authorized callers before
/// handing over to [`UUPSUpgradeable::upgrade_to_and_call`].
pub trait IUUPSUpgradeable {
    /// The error type associated to the trait implementation.
    type Error: Into<Vec<u8>>;

    /// Upgrade the implementation of the proxy to `new_implementation`.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `new_implementation` - The address of the new implementation.
    ///
    /// # Errors
    ///
    /// See [`UUPSUpgradeable::upgrade_to_and_call`].
    ///
    /// # Events
    ///
    /// * [`erc1967::Upgraded`].
    fn upgrade_to(
        &mut self,
        new_implementation: Address,
    ) -> Result<(), Self::Error>;

    /// Upgrade the implementation of the proxy to `new_implementation`, and
    /// subsequently execute the function call encoded in `data`.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `new_implementation` - The address of the new implementation.
    /// * `data` - Call to delegate to the new implementation, or empty.
    ///
    /// # Errors
    ///
    /// See [`UUPSUpgradeable::upgrade_to_and_call`].
    ///
    /// # Events
    ///
    /// * [`erc1967::Upgraded`].
    fn upgrade_to_and_call(
        &mut self,
        new_implementation: Address,
        data: Bytes,
    ) -> Result<(), Self::Error>;
}

/// Upgrade state. Only reads and writes hashed slots, never regular storage.
#[storage]
pub struct UUPSUpgradeable {
    storage_slot: StorageSlot,
    erc1967: Erc1967Utils,
}

/// Lets the `proxiableUUID` probe borrow `&mut self` as the call context.
unsafe impl TopLevelStorage for UUPSUpgradeable {}

impl UUPSUpgradeable {
    /// Marks the current storage as the storage of an implementation.
    ///
    /// Must be called from the constructor of the implementation contract.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    pub fn constructor(&mut self) {
        self.logic_flag().set(true);
    }

    /// Returns `true` when running against the storage of the
    /// implementation, i.e. not through a proxy.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    pub fn is_logic(&self) -> bool {
        self.logic_flag().get()
    }

    /// Check that the execution is being performed through a delegate call
    /// from a proxy that has an implementation set (as defined in ERC-1967).
    ///
    /// An implementation cannot learn its own address while delegated to,
    /// so "active" means the ERC-1967 slot is set, not that it points at
    /// this code. The `proxiableUUID` probe on the target of every upgrade
    /// still keeps a proxy from being upgraded into another proxy.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    ///
    /// # Errors
    ///
    /// * [`Error::NotActiveProxy`] - If called on the implementation, or
    ///   through a proxy with no implementation.
    pub fn only_proxy(&self) -> Result<(), Error> {
        if self.is_logic() || self.get_implementation().is_zero() {
            Err(Error::NotActiveProxy)
        } else {
            Ok(())
        }
    }

    /// Check that the execution is not being performed through a delegate
    /// call. This allows a function to be callable on the implementing
    /// contract but not through proxies.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    ///
    /// # Errors
    ///
    /// * [`Error::Delegated`] - If called through a proxy.
    pub fn not_delegated(&self) -> Result<(), Error> {
        if self.is_logic() {
            Ok(())
        } else {
            Err(Error::Delegated)
        }
    }

    /// Returns [`IMPLEMENTATION_SLOT`]. See
    /// [`super::erc1822::IErc1822Proxiable::proxiable_uuid`].
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    ///
    /// # Errors
    ///
    /// * [`Error::Delegated`] - If called through a proxy.
    pub fn proxiable_uuid(&self) -> Result<B256, Error> {
        self.not_delegated()?;
        Ok(IMPLEMENTATION_SLOT)
    }

    /// Returns the implementation the current proxy delegates to.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    pub fn get_implementation(&self) -> Address {
        self.erc1967.get_implementation()
    }

    /// Upgrades the proxy to `new_implementation` and delegates `data` to it
    /// when non-empty.
    ///
    /// Authorization is left to the caller and must happen before this call.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `new_implementation` - The address of the new implementation.
    /// * `data` - Call to delegate to the new implementation, or empty.
    ///
    /// # Errors
    ///
    /// * [`Error::NotActiveProxy`] - If not called through an active proxy.
    /// * [`Error::NotUups`] - If `new_implementation` does not answer
    ///   `proxiableUUID()`.
    /// * [`Error::UnsupportedProxiableUuid`] - If `new_implementation`
    ///   answers with a slot other than [`IMPLEMENTATION_SLOT`].
    /// * [`Error::InvalidImplementation`] - If `new_implementation` has no
    ///   code.
    /// * [`Error::FailedCall`] - If the setup call reverted.
    ///
    /// # Events
    ///
    /// * [`erc1967::Upgraded`].
    pub fn upgrade_to_and_call(
        &mut self,
        new_implementation: Address,
        data: &[u8],
    ) -> Result<(), Error> {
        self.only_proxy()?;
        self._upgrade_to_and_call_uups(new_implementation, data)
    }

    /// Performs an implementation upgrade with a security check for UUPS
    /// proxies, and additional setup call.
    ///
    /// As a security check, `proxiableUUID()` is invoked in the new
    /// implementation, and the return value is expected to be the
    /// implementation slot in ERC-1967.
    #[allow(deprecated)]
    fn _upgrade_to_and_call_uups(
        &mut self,
        new_implementation: Address,
        data: &[u8],
    ) -> Result<(), Error> {
        if !self.vm().has_code(new_implementation) {
            return Err(Error::InvalidImplementation);
        }

        let slot = Erc1822ProxiableInterface::new(new_implementation)
            .proxiable_uuid(Call::new_in(self))
            .map_err(|_e| Error::NotUups)?;

        if slot != IMPLEMENTATION_SLOT {
            return Err(Error::UnsupportedProxiableUuid(slot));
        }

        self.erc1967.upgrade_to(new_implementation)?;

        if !data.is_empty() {
            address::function_delegate_call(self, new_implementation, data)
                .map_err(Error::FailedCall)?;
        }

        Ok(())
    }

    fn logic_flag(&self) -> StorageBool {
        self.storage_slot
            .get_slot::<StorageBool>(U256::from_be_bytes(LOGIC_FLAG_SLOT.0))
    }
}
