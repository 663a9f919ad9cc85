//! First version of the upgradeable contract.
//!
//! Stores a `name` and a `value` that only the owner can change. The owner
//! is whoever ran [`IUpgradeableContract::initialize`] through the proxy.
use alloc::string::String;

use alloy_primitives::{Address, B256, U256};
#[allow(deprecated)]
use stylus_sdk::{
    abi::Bytes,
    msg,
    prelude::*,
    storage::{StorageString, StorageU256},
};

use super::{Error, IUpgradeableContract};
use crate::{
    access::ownable::{self, IOwnable, Ownable},
    proxy::utils::{
        erc1822::IErc1822Proxiable,
        initializable::Initializable,
        uups_upgradeable::{self, IUUPSUpgradeable, UUPSUpgradeable},
    },
};

/// State of an [`UpgradeableContractV1`].
///
/// The field order is the storage layout every later version must keep.
#[storage]
pub struct UpgradeableContractV1 {
    pub(crate) initializable: Initializable,
    pub(crate) ownable: Ownable,
    pub(crate) uups: UUPSUpgradeable,
    pub(crate) name: StorageString,
    pub(crate) value: StorageU256,
}

/// Needed so upgrades can make external calls from `&mut self`.
unsafe impl TopLevelStorage for UpgradeableContractV1 {}

#[public]
#[implements(
    IUpgradeableContract<Error = Error>,
    IOwnable<Error = ownable::Error>,
    IUUPSUpgradeable<Error = Error>,
    IErc1822Proxiable<Error = uups_upgradeable::Error>
)]
impl UpgradeableContractV1 {
    /// Marks the deployed code as an implementation and locks its own
    /// storage against initialization.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    ///
    /// # Errors
    ///
    /// * [`crate::proxy::utils::initializable::Error::Initializing`] - Never
    ///   on a fresh deployment.
    #[constructor]
    pub fn constructor(&mut self) -> Result<(), Error> {
        self.uups.constructor();
        self.initializable.disable_initializers()?;
        Ok(())
    }
}

#[public]
impl IUpgradeableContract for UpgradeableContractV1 {
    type Error = Error;

    #[allow(deprecated)]
    fn initialize(
        &mut self,
        name: String,
        value: U256,
    ) -> Result<(), Self::Error> {
        self.initializable.initializer()?;

        self.ownable._transfer_ownership(msg::sender());
        self.name.set_str(name);
        self.value.set(value);

        self.initializable.finish();
        Ok(())
    }

    fn name(&self) -> String {
        self.name.get_string()
    }

    fn value(&self) -> U256 {
        self.value.get()
    }

    fn set_name(&mut self, name: String) -> Result<(), Self::Error> {
        self.ownable.only_owner()?;
        self.name.set_str(name);
        Ok(())
    }

    fn set_value(&mut self, value: U256) -> Result<(), Self::Error> {
        self.ownable.only_owner()?;
        self.value.set(value);
        Ok(())
    }

    fn get_initialized_version(&self) -> u64 {
        self.initializable.get_initialized_version()
    }
}

#[public]
impl IOwnable for UpgradeableContractV1 {
    type Error = ownable::Error;

    fn owner(&self) -> Address {
        self.ownable.owner()
    }

    fn transfer_ownership(
        &mut self,
        new_owner: Address,
    ) -> Result<(), Self::Error> {
        self.ownable.transfer_ownership(new_owner)
    }

    fn renounce_ownership(&mut self) -> Result<(), Self::Error> {
        self.ownable.renounce_ownership()
    }
}

#[public]
impl IUUPSUpgradeable for UpgradeableContractV1 {
    type Error = Error;

    fn upgrade_to(
        &mut self,
        new_implementation: Address,
    ) -> Result<(), Self::Error> {
        self.authorize_upgrade()?;
        self.uups.upgrade_to_and_call(new_implementation, &[])?;
        Ok(())
    }

    #[payable]
    fn upgrade_to_and_call(
        &mut self,
        new_implementation: Address,
        data: Bytes,
    ) -> Result<(), Self::Error> {
        self.authorize_upgrade()?;
        self.uups.upgrade_to_and_call(new_implementation, &data)?;
        Ok(())
    }
}

#[public]
impl IErc1822Proxiable for UpgradeableContractV1 {
    type Error = uups_upgradeable::Error;

    #[selector(name = "proxiableUUID")]
    fn proxiable_uuid(&self) -> Result<B256, Self::Error> {
        self.uups.proxiable_uuid()
    }
}

impl UpgradeableContractV1 {
    /// Checks that an upgrade runs through an active proxy and was requested
    /// by the owner.
    ///
    /// # Errors
    ///
    /// * [`uups_upgradeable::Error::NotActiveProxy`] - If not called through
    ///   an active proxy.
    /// * [`ownable::Error::UnauthorizedAccount`] - If not called by the
    ///   owner.
    pub(crate) fn authorize_upgrade(&self) -> Result<(), Error> {
        self.uups.only_proxy()?;
        self.ownable.only_owner()?;
        Ok(())
    }
}
