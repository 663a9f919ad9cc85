use alloy::{
    primitives::{Address, Bytes},
    rpc::types::TransactionReceipt,
    sol,
};
use eyre::Context;

use crate::{account::Account, constructor, deploy::Deployment};

/// Crate name of the deployable ERC-1967 proxy.
pub const PROXY_PACKAGE: &str = "erc1967-proxy";

sol! {
    /// Calls every UUPS proxy answers, whatever implementation it runs.
    #[sol(rpc)]
    interface IUUPSProxy {
        function implementation() external view returns (address);
        function upgradeTo(address newImplementation) external;
        function upgradeToAndCall(address newImplementation, bytes data) external payable;

        #[derive(Debug, PartialEq)]
        event Upgraded(address indexed implementation);
    }
}

/// Deploys an implementation crate from `deployments/<package>`.
///
/// Implementations take no constructor arguments, but their constructor
/// still has to run to mark them as implementations.
///
/// # Errors
///
/// See [`crate::Deployer::deploy`].
pub async fn deploy_implementation(
    account: &Account,
    package: &str,
) -> eyre::Result<Deployment> {
    account
        .as_deployer()
        .with_package(package)
        .with_constructor(constructor!())
        .deploy()
        .await
}

/// Deploys an ERC-1967 proxy in front of `implementation`, running
/// `init_data` against the proxy in the same transaction.
///
/// Pass empty `init_data` to deploy an uninitialized proxy. Note that
/// `init_data` runs with the `StylusDeployer` as `msg.sender`, so
/// initializers that record the caller as owner should be sent separately.
///
/// # Errors
///
/// See [`crate::Deployer::deploy`]. A reverted initializer makes the whole
/// deployment fail.
#[tracing::instrument(skip(account, init_data), fields(init_len = init_data.len()))]
pub async fn deploy_proxy(
    account: &Account,
    implementation: Address,
    init_data: Bytes,
) -> eyre::Result<Deployment> {
    account
        .as_deployer()
        .with_package(PROXY_PACKAGE)
        .with_constructor(constructor!(implementation, init_data))
        .deploy()
        .await
        .wrap_err("failed to deploy proxy")
}

/// Upgrades `proxy` to `new_implementation` and runs `call` against it when
/// non-empty. `account` must own the proxy.
///
/// # Errors
///
/// * The [`alloy::contract::Error`] of the reverted upgrade, wrapped in an
///   [`eyre::Report`]. Use [`crate::RevertExt`] to inspect the reason.
#[tracing::instrument(skip(account, call))]
pub async fn upgrade_proxy(
    account: &Account,
    proxy: Address,
    new_implementation: Address,
    call: Bytes,
) -> eyre::Result<TransactionReceipt> {
    let contract = IUUPSProxy::new(proxy, account.wallet.clone());
    let receipt = contract
        .upgradeToAndCall(new_implementation, call)
        .send()
        .await?
        .get_receipt()
        .await?;

    tracing::info!(tx_hash = %receipt.transaction_hash, "proxy upgraded");
    Ok(receipt)
}

/// Returns the implementation `proxy` currently delegates to.
///
/// # Errors
///
/// May fail if the node cannot be reached or `proxy` is not a proxy.
pub async fn implementation(
    account: &Account,
    proxy: Address,
) -> eyre::Result<Address> {
    let contract = IUUPSProxy::new(proxy, account.wallet.clone());
    Ok(contract.implementation().call().await?)
}
