//! Owner-gated access for the upgradeable contracts.
//!
//! A proxy never runs the implementation's constructor, so the owner starts
//! as [`Address::ZERO`] and gets claimed by the initializer through
//! [`Ownable::_transfer_ownership`]. Setters and upgrades check the caller
//! with [`Ownable::only_owner`].
use alloc::vec::Vec;

use alloy_primitives::Address;
pub use sol::*;
#[allow(deprecated)]
use stylus_sdk::{
    call::MethodError, evm, msg, prelude::*, storage::StorageAddress,
};

use crate::utils::revert::{encode_reason, RevertReason};

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Emitted when ownership gets transferred between accounts.
        ///
        /// * `previous_owner` - Address of the previous owner.
        /// * `new_owner` - Address of the new owner.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event OwnershipTransferred(address indexed previous_owner, address indexed new_owner);
    }
}

/// An error that occurred in the implementation of an [`Ownable`] contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The caller account is not authorized to perform an operation.
    UnauthorizedAccount,
    /// The owner is not a valid owner account (e.g. [`Address::ZERO`]).
    InvalidOwner,
}

impl RevertReason for Error {
    fn reason(&self) -> &'static str {
        match self {
            Error::UnauthorizedAccount => "Ownable: caller is not the owner",
            Error::InvalidOwner => "Ownable: new owner is the zero address",
        }
    }
}

impl From<Error> for Vec<u8> {
    fn from(e: Error) -> Self {
        encode_reason(e.reason())
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
impl MethodError for Error {
    fn encode(self) -> Vec<u8> {
        self.into()
    }
}

/// Single-owner access control, stored in the proxy.
#[storage]
pub struct Ownable {
    pub(crate) owner: StorageAddress,
}

/// Ownership surface exposed by the upgradeable contracts.
pub trait IOwnable {
    /// Error returned by the owner-gated operations.
    type Error: Into<Vec<u8>>;

    /// Current owner, or [`Address::ZERO`] when nobody owns the storage yet.
    #[must_use]
    fn owner(&self) -> Address;

    /// Hands the contract over to `new_owner`. Owner only.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If the caller is not the owner.
    /// * [`Error::InvalidOwner`] - If `new_owner` is [`Address::ZERO`].
    ///
    /// # Events
    ///
    /// * [`OwnershipTransferred`].
    fn transfer_ownership(
        &mut self,
        new_owner: Address,
    ) -> Result<(), Self::Error>;

    /// Drops the owner. Setters and upgrades are locked afterwards.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If the caller is not the owner.
    ///
    /// # Events
    ///
    /// * [`OwnershipTransferred`].
    fn renounce_ownership(&mut self) -> Result<(), Self::Error>;
}

#[public]
#[implements(IOwnable<Error = Error>)]
impl Ownable {}

#[public]
impl IOwnable for Ownable {
    type Error = Error;

    fn owner(&self) -> Address {
        self.owner()
    }

    fn transfer_ownership(
        &mut self,
        new_owner: Address,
    ) -> Result<(), Self::Error> {
        self.transfer_ownership(new_owner)
    }

    fn renounce_ownership(&mut self) -> Result<(), Self::Error> {
        self.renounce_ownership()
    }
}

impl Ownable {
    /// See [`IOwnable::owner`].
    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner.get()
    }

    /// See [`IOwnable::transfer_ownership`].
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If the caller is not the owner.
    /// * [`Error::InvalidOwner`] - If `new_owner` is [`Address::ZERO`].
    pub fn transfer_ownership(
        &mut self,
        new_owner: Address,
    ) -> Result<(), Error> {
        self.only_owner()?;
        if new_owner.is_zero() {
            return Err(Error::InvalidOwner);
        }
        self._transfer_ownership(new_owner);
        Ok(())
    }

    /// See [`IOwnable::renounce_ownership`].
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If the caller is not the owner.
    pub fn renounce_ownership(&mut self) -> Result<(), Error> {
        self.only_owner()?;
        self._transfer_ownership(Address::ZERO);
        Ok(())
    }

    /// Guard for owner-gated operations, including upgrade authorization.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If [`msg::sender`] is not the
    ///   owner.
    #[allow(deprecated)]
    pub fn only_owner(&self) -> Result<(), Error> {
        if msg::sender() == self.owner() {
            Ok(())
        } else {
            Err(Error::UnauthorizedAccount)
        }
    }

    /// Sets the owner without any check. Initializers call this to claim the
    /// proxy storage for their caller.
    ///
    /// # Events
    ///
    /// * [`OwnershipTransferred`].
    #[allow(deprecated)]
    pub fn _transfer_ownership(&mut self, new_owner: Address) {
        let previous_owner = self.owner.get();
        self.owner.set(new_owner);
        evm::log(OwnershipTransferred { previous_owner, new_owner });
    }
}
