use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use eyre::{bail, Context};

use crate::environment::{env, get_node_path, RPC_URL};

/// Convenience type alias that represents an Ethereum wallet: a provider
/// that fills gas, nonce and chain id, and signs with a local key.
pub type Wallet = DynProvider;

/// Reads the node endpoint from [`RPC_URL`].
///
/// # Errors
///
/// * If [`RPC_URL`] is missing or not a URL.
pub fn rpc_url() -> eyre::Result<Url> {
    env(RPC_URL)?
        .parse()
        .wrap_err(format!("failed to parse {RPC_URL} into a URL"))
}

/// Builds a [`Wallet`] that signs with `signer` and talks to `url`.
#[must_use]
pub fn wallet(signer: PrivateKeySigner, url: Url) -> Wallet {
    ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(url)
        .erased()
}

/// Sends `amount` eth to `address` in the nitro test node.
///
/// # Errors
///
/// * If the test node checkout is missing or the transfer fails.
pub fn fund_account(address: Address, amount: u32) -> eyre::Result<()> {
    let node_script = get_node_path()?.join("test-node.bash");
    if !node_script.exists() {
        bail!("Test nitro node wasn't setup properly. Try to setup it first with `./scripts/nitro-testnode.sh -i -d`")
    };

    let output = std::process::Command::new(node_script)
        .arg("script")
        .arg("send-l2")
        .arg("--to")
        .arg(format!("address_{address}"))
        .arg("--ethamount")
        .arg(amount.to_string())
        .output()?;

    if !output.status.success() {
        let err = String::from_utf8_lossy(&output.stderr);
        bail!("account's wallet wasn't funded - address is {address}:\n{err}")
    }

    tracing::debug!(%address, amount, "funded account through test node");
    Ok(())
}
