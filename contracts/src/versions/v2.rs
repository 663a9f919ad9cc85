//! Second version of the upgradeable contract.
//!
//! Keeps the whole V1 state as a prefix and appends a feature flag and a
//! second value. The V1 initializer is disabled; proxies upgraded from V1 run
//! [`UpgradeableContractV2::initialize_v2`] instead.
use alloc::string::String;

use alloy_primitives::{Address, B256, U256};
#[allow(deprecated)]
use stylus_sdk::{
    abi::Bytes,
    msg,
    prelude::*,
    storage::{StorageBool, StorageU256},
};

use super::{v1::UpgradeableContractV1, Error, IUpgradeableContract};
use crate::{
    access::ownable::{self, IOwnable},
    proxy::utils::{
        erc1822::IErc1822Proxiable,
        uups_upgradeable::{self, IUUPSUpgradeable},
    },
};

/// Initializer version run by [`UpgradeableContractV2::initialize_v2`].
pub const VERSION: u64 = 2;

/// State of an [`UpgradeableContractV2`].
#[storage]
pub struct UpgradeableContractV2 {
    v1: UpgradeableContractV1,
    new_feature_enabled: StorageBool,
    new_value: StorageU256,
}

/// Needed so upgrades can make external calls from `&mut self`.
unsafe impl TopLevelStorage for UpgradeableContractV2 {}

#[public]
#[implements(
    IUpgradeableContract<Error = Error>,
    IOwnable<Error = ownable::Error>,
    IUUPSUpgradeable<Error = Error>,
    IErc1822Proxiable<Error = uups_upgradeable::Error>
)]
impl UpgradeableContractV2 {
    /// See [`UpgradeableContractV1::constructor`].
    ///
    /// # Errors
    ///
    /// * [`crate::proxy::utils::initializable::Error::Initializing`] - Never
    ///   on a fresh deployment.
    #[constructor]
    pub fn constructor(&mut self) -> Result<(), Error> {
        self.v1.constructor()
    }

    /// Enables the new feature on a proxy running this version.
    ///
    /// On a proxy deployed straight onto V2, where the V1 initializer never
    /// ran, the caller becomes the owner. A proxy upgraded from V1 keeps its
    /// owner, even one that was renounced.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    ///
    /// # Errors
    ///
    /// * [`crate::proxy::utils::initializable::Error::AlreadyInitialized`] -
    ///   If version 2 already ran, or on the implementation itself.
    ///
    /// # Events
    ///
    /// * [`crate::proxy::utils::initializable::Initialized`].
    #[selector(name = "initializeV2")]
    #[allow(deprecated)]
    pub fn initialize_v2(&mut self) -> Result<(), Error> {
        let fresh = self.v1.initializable.get_initialized_version() == 0;
        self.v1.initializable.reinitializer(VERSION)?;

        if fresh {
            self.v1.ownable._transfer_ownership(msg::sender());
        }
        self.new_feature_enabled.set(true);

        self.v1.initializable.finish();
        Ok(())
    }

    /// Returns whether [`Self::initialize_v2`] ran.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    pub fn new_feature_enabled(&self) -> bool {
        self.new_feature_enabled.get()
    }

    /// Returns the value added in V2.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    pub fn new_value(&self) -> U256 {
        self.new_value.get()
    }

    /// Replaces the value added in V2. Open to any caller.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `value` - The new value.
    pub fn set_new_value(&mut self, value: U256) {
        self.new_value.set(value);
    }
}

#[public]
impl IUpgradeableContract for UpgradeableContractV2 {
    type Error = Error;

    fn initialize(
        &mut self,
        _name: String,
        _value: U256,
    ) -> Result<(), Self::Error> {
        Err(Error::UseV1Initializer)
    }

    fn name(&self) -> String {
        self.v1.name()
    }

    fn value(&self) -> U256 {
        self.v1.value()
    }

    fn set_name(&mut self, name: String) -> Result<(), Self::Error> {
        self.v1.set_name(name)
    }

    fn set_value(&mut self, value: U256) -> Result<(), Self::Error> {
        self.v1.set_value(value)
    }

    fn get_initialized_version(&self) -> u64 {
        self.v1.get_initialized_version()
    }
}

#[public]
impl IOwnable for UpgradeableContractV2 {
    type Error = ownable::Error;

    fn owner(&self) -> Address {
        self.v1.owner()
    }

    fn transfer_ownership(
        &mut self,
        new_owner: Address,
    ) -> Result<(), Self::Error> {
        self.v1.transfer_ownership(new_owner)
    }

    fn renounce_ownership(&mut self) -> Result<(), Self::Error> {
        self.v1.renounce_ownership()
    }
}

#[public]
impl IUUPSUpgradeable for UpgradeableContractV2 {
    type Error = Error;

    fn upgrade_to(
        &mut self,
        new_implementation: Address,
    ) -> Result<(), Self::Error> {
        self.v1.upgrade_to(new_implementation)
    }

    #[payable]
    fn upgrade_to_and_call(
        &mut self,
        new_implementation: Address,
        data: Bytes,
    ) -> Result<(), Self::Error> {
        self.v1.upgrade_to_and_call(new_implementation, data)
    }
}

#[public]
impl IErc1822Proxiable for UpgradeableContractV2 {
    type Error = uups_upgradeable::Error;

    #[selector(name = "proxiableUUID")]
    fn proxiable_uuid(&self) -> Result<B256, Self::Error> {
        self.v1.proxiable_uuid()
    }
}

#[cfg(test)]
mod tests {
    use alloy_sol_types::{SolCall, SolType, SolValue};
    use motsu::prelude::*;
    use stylus_sdk::{
        alloy_primitives::{address, uint, Address, B256, U256},
        storage::StorageU256,
    };

    use super::*;
    use crate::{
        proxy::erc1967::Erc1967Proxy, utils::revert::encode_reason,
        versions::abi::IUpgradeable,
    };

    const READER: Address =
        address!("0x00000000000000000000000000000000000000aa");

    #[storage]
    struct NotProxiable {
        count: StorageU256,
    }

    unsafe impl TopLevelStorage for NotProxiable {}

    #[public]
    impl NotProxiable {
        fn count(&self) -> U256 {
            self.count.get()
        }
    }

    #[storage]
    struct WrongSlot {
        count: StorageU256,
    }

    unsafe impl TopLevelStorage for WrongSlot {}

    #[public]
    impl WrongSlot {
        #[selector(name = "proxiableUUID")]
        fn proxiable_uuid(&self) -> B256 {
            B256::ZERO
        }
    }

    fn call(
        proxy: &Contract<Erc1967Proxy>,
        sender: Address,
        data: &[u8],
    ) -> Result<Vec<u8>, Vec<u8>> {
        proxy.sender(sender).fallback(data)
    }

    fn read<T>(proxy: &Contract<Erc1967Proxy>, data: &[u8]) -> T
    where
        T: SolValue + From<<T::SolType as SolType>::RustType>,
    {
        let ret = proxy
            .sender(READER)
            .fallback(data)
            .motsu_expect("getter should not revert");
        T::abi_decode(&ret, true).expect("should decode return data")
    }

    fn deploy_v1(
        proxy: &Contract<Erc1967Proxy>,
        v1: &Contract<UpgradeableContractV1>,
        owner: Address,
        name: &str,
        value: U256,
    ) {
        v1.sender(owner)
            .constructor()
            .motsu_expect("should deploy V1 implementation");

        let data = IUpgradeable::initializeCall { name: name.into(), value }
            .abi_encode();
        proxy
            .sender(owner)
            .constructor(v1.address(), data.into())
            .motsu_expect("should deploy the proxy");
    }

    fn deploy_v2_implementation(
        v2: &Contract<UpgradeableContractV2>,
        deployer: Address,
    ) {
        v2.sender(deployer)
            .constructor()
            .motsu_expect("should deploy V2 implementation");
    }

    fn upgrade_to(
        proxy: &Contract<Erc1967Proxy>,
        owner: Address,
        implementation: Address,
    ) {
        call(
            proxy,
            owner,
            &IUpgradeable::upgradeToCall { newImplementation: implementation }
                .abi_encode(),
        )
        .motsu_expect("owner should upgrade");
    }

    #[motsu::test]
    fn upgrade_preserves_state_and_enables_feature(
        proxy: Contract<Erc1967Proxy>,
        v1: Contract<UpgradeableContractV1>,
        v2: Contract<UpgradeableContractV2>,
        alice: Address,
    ) {
        deploy_v1(&proxy, &v1, alice, "V1Contract", uint!(100_U256));

        call(
            &proxy,
            alice,
            &IUpgradeable::setValueCall { value: uint!(500_U256) }
                .abi_encode(),
        )
        .motsu_expect("owner should set value");
        call(
            &proxy,
            alice,
            &IUpgradeable::setNameCall { name: "UpgradedContract".into() }
                .abi_encode(),
        )
        .motsu_expect("owner should set name");

        deploy_v2_implementation(&v2, alice);
        upgrade_to(&proxy, alice, v2.address());
        assert_eq!(proxy.sender(alice).implementation(), v2.address());

        let enabled: bool = read(
            &proxy,
            &IUpgradeable::newFeatureEnabledCall {}.abi_encode(),
        );
        assert!(!enabled);

        call(&proxy, alice, &IUpgradeable::initializeV2Call {}.abi_encode())
            .motsu_expect("should run the V2 initializer");

        let value: U256 =
            read(&proxy, &IUpgradeable::valueCall {}.abi_encode());
        let name: String = read(&proxy, &IUpgradeable::nameCall {}.abi_encode());
        let enabled: bool = read(
            &proxy,
            &IUpgradeable::newFeatureEnabledCall {}.abi_encode(),
        );
        let owner: Address =
            read(&proxy, &IUpgradeable::ownerCall {}.abi_encode());
        assert_eq!(value, uint!(500_U256));
        assert_eq!(name, "UpgradedContract");
        assert!(enabled);
        assert_eq!(owner, alice);

        call(
            &proxy,
            alice,
            &IUpgradeable::setNewValueCall { value: uint!(1234_U256) }
                .abi_encode(),
        )
        .motsu_expect("should set the new value");
        let new_value: U256 =
            read(&proxy, &IUpgradeable::newValueCall {}.abi_encode());
        assert_eq!(new_value, uint!(1234_U256));
    }

    #[motsu::test]
    fn upgrade_and_initialize_atomically(
        proxy: Contract<Erc1967Proxy>,
        v1: Contract<UpgradeableContractV1>,
        v2: Contract<UpgradeableContractV2>,
        alice: Address,
    ) {
        deploy_v1(&proxy, &v1, alice, "TestContract", uint!(42_U256));
        deploy_v2_implementation(&v2, alice);

        call(
            &proxy,
            alice,
            &IUpgradeable::upgradeToAndCallCall {
                newImplementation: v2.address(),
                data: IUpgradeable::initializeV2Call {}.abi_encode().into(),
            }
            .abi_encode(),
        )
        .motsu_expect("should upgrade and initialize");

        assert_eq!(proxy.sender(alice).implementation(), v2.address());
        let enabled: bool = read(
            &proxy,
            &IUpgradeable::newFeatureEnabledCall {}.abi_encode(),
        );
        assert!(enabled);
        let version: u64 = read(
            &proxy,
            &IUpgradeable::getInitializedVersionCall {}.abi_encode(),
        );
        assert_eq!(version, VERSION);
    }

    #[motsu::test]
    fn upgrade_with_empty_data_skips_setup_call(
        proxy: Contract<Erc1967Proxy>,
        v1: Contract<UpgradeableContractV1>,
        v2: Contract<UpgradeableContractV2>,
        alice: Address,
    ) {
        deploy_v1(&proxy, &v1, alice, "TestContract", uint!(42_U256));
        deploy_v2_implementation(&v2, alice);

        call(
            &proxy,
            alice,
            &IUpgradeable::upgradeToAndCallCall {
                newImplementation: v2.address(),
                data: vec![].into(),
            }
            .abi_encode(),
        )
        .motsu_expect("should upgrade");

        let enabled: bool = read(
            &proxy,
            &IUpgradeable::newFeatureEnabledCall {}.abi_encode(),
        );
        assert!(!enabled);
        let version: u64 = read(
            &proxy,
            &IUpgradeable::getInitializedVersionCall {}.abi_encode(),
        );
        assert_eq!(version, 1);
    }

    #[motsu::test]
    fn v1_initializer_is_disabled(
        proxy: Contract<Erc1967Proxy>,
        v1: Contract<UpgradeableContractV1>,
        v2: Contract<UpgradeableContractV2>,
        alice: Address,
    ) {
        deploy_v1(&proxy, &v1, alice, "TestContract", uint!(42_U256));
        deploy_v2_implementation(&v2, alice);
        upgrade_to(&proxy, alice, v2.address());

        for (name, value) in [("Again", U256::ZERO), ("", uint!(7_U256))] {
            let err = call(
                &proxy,
                alice,
                &IUpgradeable::initializeCall { name: name.into(), value }
                    .abi_encode(),
            )
            .motsu_expect_err("V1 initializer should be disabled");
            assert_eq!(err, encode_reason("Use V1 initializer only"));
        }
    }

    #[motsu::test]
    fn initialize_v2_runs_once(
        proxy: Contract<Erc1967Proxy>,
        v1: Contract<UpgradeableContractV1>,
        v2: Contract<UpgradeableContractV2>,
        alice: Address,
    ) {
        deploy_v1(&proxy, &v1, alice, "TestContract", uint!(42_U256));
        deploy_v2_implementation(&v2, alice);
        upgrade_to(&proxy, alice, v2.address());

        call(&proxy, alice, &IUpgradeable::initializeV2Call {}.abi_encode())
            .motsu_expect("should run the V2 initializer");
        let err = call(
            &proxy,
            alice,
            &IUpgradeable::initializeV2Call {}.abi_encode(),
        )
        .motsu_expect_err("V2 initializer should run once");
        assert_eq!(
            err,
            encode_reason("Initializable: contract is already initialized")
        );
    }

    #[motsu::test]
    fn initialize_v2_keeps_existing_owner(
        proxy: Contract<Erc1967Proxy>,
        v1: Contract<UpgradeableContractV1>,
        v2: Contract<UpgradeableContractV2>,
        alice: Address,
        bob: Address,
    ) {
        deploy_v1(&proxy, &v1, alice, "TestContract", uint!(42_U256));
        deploy_v2_implementation(&v2, alice);
        upgrade_to(&proxy, alice, v2.address());

        call(&proxy, bob, &IUpgradeable::initializeV2Call {}.abi_encode())
            .motsu_expect("should run the V2 initializer");

        let owner: Address =
            read(&proxy, &IUpgradeable::ownerCall {}.abi_encode());
        assert_eq!(owner, alice);
    }

    #[motsu::test]
    fn initialize_v2_cannot_reclaim_renounced_proxy(
        proxy: Contract<Erc1967Proxy>,
        v1: Contract<UpgradeableContractV1>,
        v2: Contract<UpgradeableContractV2>,
        alice: Address,
        bob: Address,
    ) {
        deploy_v1(&proxy, &v1, alice, "TestContract", uint!(42_U256));
        deploy_v2_implementation(&v2, alice);
        upgrade_to(&proxy, alice, v2.address());

        call(
            &proxy,
            alice,
            &IUpgradeable::renounceOwnershipCall {}.abi_encode(),
        )
        .motsu_expect("owner should renounce");

        call(&proxy, bob, &IUpgradeable::initializeV2Call {}.abi_encode())
            .motsu_expect("should run the V2 initializer");

        let owner: Address =
            read(&proxy, &IUpgradeable::ownerCall {}.abi_encode());
        assert_eq!(owner, Address::ZERO);

        let err = call(
            &proxy,
            bob,
            &IUpgradeable::setNameCall { name: "Hijacked".into() }
                .abi_encode(),
        )
        .motsu_expect_err("nobody should own a renounced proxy");
        assert_eq!(err, encode_reason("Ownable: caller is not the owner"));

        let name: String = read(&proxy, &IUpgradeable::nameCall {}.abi_encode());
        assert_eq!(name, "TestContract");
    }

    #[motsu::test]
    fn fresh_v2_proxy_is_owned_by_first_initializer(
        proxy: Contract<Erc1967Proxy>,
        v2: Contract<UpgradeableContractV2>,
        alice: Address,
        bob: Address,
    ) {
        deploy_v2_implementation(&v2, alice);
        proxy
            .sender(alice)
            .constructor(v2.address(), vec![].into())
            .motsu_expect("should deploy the proxy");

        call(&proxy, alice, &IUpgradeable::initializeV2Call {}.abi_encode())
            .motsu_expect("should run the V2 initializer");

        let owner: Address =
            read(&proxy, &IUpgradeable::ownerCall {}.abi_encode());
        assert_eq!(owner, alice);

        call(
            &proxy,
            alice,
            &IUpgradeable::setNameCall { name: "UpdatedName".into() }
                .abi_encode(),
        )
        .motsu_expect("owner should set name");
        let name: String = read(&proxy, &IUpgradeable::nameCall {}.abi_encode());
        assert_eq!(name, "UpdatedName");

        let err = call(
            &proxy,
            bob,
            &IUpgradeable::setNameCall { name: "Hacked".into() }.abi_encode(),
        )
        .motsu_expect_err("non-owner should not set name");
        assert_eq!(err, encode_reason("Ownable: caller is not the owner"));
    }

    #[motsu::test]
    fn anyone_sets_new_value(
        proxy: Contract<Erc1967Proxy>,
        v1: Contract<UpgradeableContractV1>,
        v2: Contract<UpgradeableContractV2>,
        alice: Address,
        bob: Address,
    ) {
        deploy_v1(&proxy, &v1, alice, "TestContract", uint!(42_U256));
        deploy_v2_implementation(&v2, alice);
        upgrade_to(&proxy, alice, v2.address());

        call(
            &proxy,
            bob,
            &IUpgradeable::setNewValueCall { value: uint!(9_U256) }
                .abi_encode(),
        )
        .motsu_expect("setNewValue is not owner-restricted");

        let new_value: U256 =
            read(&proxy, &IUpgradeable::newValueCall {}.abi_encode());
        assert_eq!(new_value, uint!(9_U256));
    }

    #[motsu::test]
    fn rejects_implementation_without_proxiable_uuid(
        proxy: Contract<Erc1967Proxy>,
        v1: Contract<UpgradeableContractV1>,
        plain: Contract<NotProxiable>,
        alice: Address,
    ) {
        deploy_v1(&proxy, &v1, alice, "TestContract", uint!(42_U256));

        let err = call(
            &proxy,
            alice,
            &IUpgradeable::upgradeToCall { newImplementation: plain.address() }
                .abi_encode(),
        )
        .motsu_expect_err("non-UUPS implementation should be rejected");
        assert_eq!(
            err,
            encode_reason("ERC1967Upgrade: new implementation is not UUPS")
        );
        assert_eq!(proxy.sender(alice).implementation(), v1.address());
    }

    #[motsu::test]
    fn rejects_proxy_as_implementation(
        proxy: Contract<Erc1967Proxy>,
        other_proxy: Contract<Erc1967Proxy>,
        v1: Contract<UpgradeableContractV1>,
        alice: Address,
    ) {
        deploy_v1(&proxy, &v1, alice, "TestContract", uint!(42_U256));
        other_proxy
            .sender(alice)
            .constructor(v1.address(), vec![].into())
            .motsu_expect("should deploy the second proxy");

        let err = call(
            &proxy,
            alice,
            &IUpgradeable::upgradeToCall {
                newImplementation: other_proxy.address(),
            }
            .abi_encode(),
        )
        .motsu_expect_err("a proxy should not be an implementation");
        assert_eq!(
            err,
            encode_reason("ERC1967Upgrade: new implementation is not UUPS")
        );
    }

    #[motsu::test]
    fn rejects_unsupported_proxiable_uuid(
        proxy: Contract<Erc1967Proxy>,
        v1: Contract<UpgradeableContractV1>,
        wrong: Contract<WrongSlot>,
        alice: Address,
    ) {
        deploy_v1(&proxy, &v1, alice, "TestContract", uint!(42_U256));

        let err = call(
            &proxy,
            alice,
            &IUpgradeable::upgradeToCall { newImplementation: wrong.address() }
                .abi_encode(),
        )
        .motsu_expect_err("wrong slot should be rejected");
        assert_eq!(
            err,
            encode_reason("ERC1967Upgrade: unsupported proxiableUUID")
        );
    }

    #[motsu::test]
    fn failed_setup_call_reverts_upgrade(
        proxy: Contract<Erc1967Proxy>,
        v1: Contract<UpgradeableContractV1>,
        v2: Contract<UpgradeableContractV2>,
        alice: Address,
    ) {
        deploy_v1(&proxy, &v1, alice, "TestContract", uint!(42_U256));
        deploy_v2_implementation(&v2, alice);

        let err = call(
            &proxy,
            alice,
            &IUpgradeable::upgradeToAndCallCall {
                newImplementation: v2.address(),
                data: IUpgradeable::initializeCall {
                    name: "Again".into(),
                    value: U256::ZERO,
                }
                .abi_encode()
                .into(),
            }
            .abi_encode(),
        )
        .motsu_expect_err("setup call revert should bubble");
        assert_eq!(err, encode_reason("Use V1 initializer only"));
        assert_eq!(proxy.sender(alice).implementation(), v1.address());
    }

    #[motsu::test]
    fn v2_upgrades_further(
        proxy: Contract<Erc1967Proxy>,
        v1: Contract<UpgradeableContractV1>,
        v2: Contract<UpgradeableContractV2>,
        next: Contract<UpgradeableContractV2>,
        alice: Address,
        bob: Address,
    ) {
        deploy_v1(&proxy, &v1, alice, "TestContract", uint!(42_U256));
        deploy_v2_implementation(&v2, alice);
        deploy_v2_implementation(&next, alice);
        upgrade_to(&proxy, alice, v2.address());

        let err = call(
            &proxy,
            bob,
            &IUpgradeable::upgradeToCall { newImplementation: next.address() }
                .abi_encode(),
        )
        .motsu_expect_err("non-owner should not upgrade");
        assert_eq!(err, encode_reason("Ownable: caller is not the owner"));

        upgrade_to(&proxy, alice, next.address());
        assert_eq!(proxy.sender(alice).implementation(), next.address());
        let name: String = read(&proxy, &IUpgradeable::nameCall {}.abi_encode());
        assert_eq!(name, "TestContract");
    }

    #[motsu::test]
    fn implementation_rejects_initializers(
        v2: Contract<UpgradeableContractV2>,
        alice: Address,
    ) {
        deploy_v2_implementation(&v2, alice);

        let err = v2.sender(alice).initialize_v2().motsu_unwrap_err();
        assert_eq!(
            err,
            Error::Initializable(
                crate::proxy::utils::initializable::Error::AlreadyInitialized
            )
        );
        assert!(!v2.sender(alice).new_feature_enabled());
    }
}
