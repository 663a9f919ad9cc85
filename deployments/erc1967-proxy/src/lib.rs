#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

use alloc::vec::Vec;

use stylus_sdk::{
    abi::Bytes, alloy_primitives::Address, prelude::*, ArbResult,
};
use upgradeable_contracts::proxy::{
    erc1967::{self, Erc1967Proxy},
    IProxy,
};

#[entrypoint]
#[storage]
struct UpgradeableProxy {
    erc1967: Erc1967Proxy,
}

#[public]
impl UpgradeableProxy {
    #[constructor]
    pub fn constructor(
        &mut self,
        implementation: Address,
        data: Bytes,
    ) -> Result<(), erc1967::Error> {
        self.erc1967.constructor(implementation, data)
    }

    fn implementation(&self) -> Address {
        IProxy::implementation(self)
    }

    #[fallback]
    fn fallback(&mut self, calldata: &[u8]) -> ArbResult {
        self.do_fallback(calldata)
    }
}

impl IProxy for UpgradeableProxy {
    fn implementation(&self) -> Address {
        self.erc1967.implementation()
    }
}
