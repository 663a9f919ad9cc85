#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

use alloc::{string::String, vec::Vec};

use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, B256, U256},
    prelude::*,
};
use upgradeable_contracts::{
    access::ownable::{self, IOwnable},
    proxy::utils::{
        erc1822::IErc1822Proxiable,
        uups_upgradeable::{self, IUUPSUpgradeable},
    },
    versions::{v2::UpgradeableContractV2, Error, IUpgradeableContract},
};

#[entrypoint]
#[storage]
struct UpgradeableV2 {
    contract: UpgradeableContractV2,
}

#[public]
#[implements(
    IUpgradeableContract<Error = Error>,
    IOwnable<Error = ownable::Error>,
    IUUPSUpgradeable<Error = Error>,
    IErc1822Proxiable<Error = uups_upgradeable::Error>
)]
impl UpgradeableV2 {
    #[constructor]
    fn constructor(&mut self) -> Result<(), Error> {
        self.contract.constructor()
    }

    #[selector(name = "initializeV2")]
    fn initialize_v2(&mut self) -> Result<(), Error> {
        self.contract.initialize_v2()
    }

    fn new_feature_enabled(&self) -> bool {
        self.contract.new_feature_enabled()
    }

    fn new_value(&self) -> U256 {
        self.contract.new_value()
    }

    fn set_new_value(&mut self, value: U256) {
        self.contract.set_new_value(value);
    }
}

#[public]
impl IUpgradeableContract for UpgradeableV2 {
    type Error = Error;

    fn initialize(
        &mut self,
        name: String,
        value: U256,
    ) -> Result<(), Self::Error> {
        self.contract.initialize(name, value)
    }

    fn name(&self) -> String {
        self.contract.name()
    }

    fn value(&self) -> U256 {
        self.contract.value()
    }

    fn set_name(&mut self, name: String) -> Result<(), Self::Error> {
        self.contract.set_name(name)
    }

    fn set_value(&mut self, value: U256) -> Result<(), Self::Error> {
        self.contract.set_value(value)
    }

    fn get_initialized_version(&self) -> u64 {
        self.contract.get_initialized_version()
    }
}

#[public]
impl IOwnable for UpgradeableV2 {
    type Error = ownable::Error;

    fn owner(&self) -> Address {
        self.contract.owner()
    }

    fn transfer_ownership(
        &mut self,
        new_owner: Address,
    ) -> Result<(), Self::Error> {
        self.contract.transfer_ownership(new_owner)
    }

    fn renounce_ownership(&mut self) -> Result<(), Self::Error> {
        self.contract.renounce_ownership()
    }
}

#[public]
impl IUUPSUpgradeable for UpgradeableV2 {
    type Error = Error;

    fn upgrade_to(
        &mut self,
        new_implementation: Address,
    ) -> Result<(), Self::Error> {
        self.contract.upgrade_to(new_implementation)
    }

    #[payable]
    fn upgrade_to_and_call(
        &mut self,
        new_implementation: Address,
        data: Bytes,
    ) -> Result<(), Self::Error> {
        self.contract.upgrade_to_and_call(new_implementation, data)
    }
}

#[public]
impl IErc1822Proxiable for UpgradeableV2 {
    type Error = uups_upgradeable::Error;

    #[selector(name = "proxiableUUID")]
    fn proxiable_uuid(&self) -> Result<B256, Self::Error> {
        self.contract.proxiable_uuid()
    }
}
