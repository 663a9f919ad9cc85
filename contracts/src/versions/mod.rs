//! The versions of the upgradeable contract deployed behind an
//! [`crate::proxy::erc1967::Erc1967Proxy`].
//!
//! Every version keeps the storage layout of the previous one as a prefix:
//! [`v2::UpgradeableContractV2`] embeds [`v1::UpgradeableContractV1`] as its
//! first field and only appends new fields after it.
use alloc::{string::String, vec::Vec};

use alloy_primitives::U256;
use stylus_sdk::call::MethodError;

use crate::{
    access::ownable,
    proxy::utils::{initializable, uups_upgradeable},
    utils::revert::{encode_reason, RevertReason},
};

pub mod v1;
pub mod v2;

/// An error returned by the versioned contracts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Error from the [`ownable::Ownable`] component.
    Ownable(ownable::Error),
    /// Error from the [`initializable::Initializable`] component.
    Initializable(initializable::Error),
    /// Error from the [`uups_upgradeable::UUPSUpgradeable`] component.
    Uups(uups_upgradeable::Error),
    /// The V1 initializer was called on a later version.
    UseV1Initializer,
}

impl From<ownable::Error> for Error {
    fn from(e: ownable::Error) -> Self {
        Error::Ownable(e)
    }
}

impl From<initializable::Error> for Error {
    fn from(e: initializable::Error) -> Self {
        Error::Initializable(e)
    }
}

impl From<uups_upgradeable::Error> for Error {
    fn from(e: uups_upgradeable::Error) -> Self {
        Error::Uups(e)
    }
}

impl From<Error> for Vec<u8> {
    fn from(e: Error) -> Self {
        match e {
            Error::Ownable(e) => e.into(),
            Error::Initializable(e) => e.into(),
            Error::Uups(e) => e.into(),
            Error::UseV1Initializer => encode_reason("Use V1 initializer only"),
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
impl MethodError for Error {
    fn encode(self) -> Vec<u8> {
        self.into()
    }
}

/// Public interface shared by every version of the upgradeable contract.
pub trait IUpgradeableContract {
    /// The error type associated to the trait implementation.
    type Error: Into<Vec<u8>>;

    /// Sets `name` and `value` and makes the caller the owner.
    ///
    /// Runs once per proxy, usually as the setup call of the proxy
    /// constructor.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `name` - Initial name.
    /// * `value` - Initial value.
    ///
    /// # Errors
    ///
    /// * [`initializable::Error::AlreadyInitialized`] - If the storage has
    ///   already been initialized.
    ///
    /// # Events
    ///
    /// * [`ownable::OwnershipTransferred`].
    /// * [`initializable::Initialized`].
    fn initialize(
        &mut self,
        name: String,
        value: U256,
    ) -> Result<(), Self::Error>;

    /// Returns the stored name.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    fn name(&self) -> String;

    /// Returns the stored value.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    fn value(&self) -> U256;

    /// Replaces the stored name. Owner only.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `name` - The new name.
    ///
    /// # Errors
    ///
    /// * [`ownable::Error::UnauthorizedAccount`] - If not called by the
    ///   owner.
    fn set_name(&mut self, name: String) -> Result<(), Self::Error>;

    /// Replaces the stored value. Owner only.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `value` - The new value.
    ///
    /// # Errors
    ///
    /// * [`ownable::Error::UnauthorizedAccount`] - If not called by the
    ///   owner.
    fn set_value(&mut self, value: U256) -> Result<(), Self::Error>;

    /// Returns the highest initializer version run on this storage.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    fn get_initialized_version(&self) -> u64;
}
