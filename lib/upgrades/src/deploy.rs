use std::{path::PathBuf, process::Command, str::FromStr};

use alloy::{
    network::EthereumWallet,
    primitives::{Address, Bytes, TxHash, U256},
    providers::{Provider, ProviderBuilder},
    rpc::types::TransactionReceipt,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use eyre::{Context, ContextCompat};
use regex::Regex;

use crate::environment::{env, get_workspace_root, DEPLOYER_ADDRESS};

/// Directory holding the deployable contract crates.
const DEPLOYMENTS_DIR: &str = "deployments";

/// A constructor argument as accepted by `cargo stylus deploy
/// --experimental-constructor-args`.
pub trait ConstructorArg {
    /// Renders the argument for the command line.
    fn to_arg(&self) -> String;
}

impl ConstructorArg for Address {
    fn to_arg(&self) -> String {
        self.to_string()
    }
}

impl ConstructorArg for U256 {
    fn to_arg(&self) -> String {
        self.to_string()
    }
}

impl ConstructorArg for String {
    fn to_arg(&self) -> String {
        self.clone()
    }
}

impl ConstructorArg for Bytes {
    fn to_arg(&self) -> String {
        format!("0x{}", alloy::hex::encode(self))
    }
}

/// Collects constructor arguments for [`Deployer::with_constructor`].
///
/// ```ignore
/// let args = constructor!(implementation, data);
/// ```
#[macro_export]
macro_rules! constructor {
    () => {{
        ::std::vec::Vec::<::std::string::String>::new()
    }};

    ($($arg:expr),+ $(,)?) => {{
        vec![$($crate::ConstructorArg::to_arg(&$arg)),+]
    }};
}

/// A deployed contract.
#[derive(Debug)]
pub struct Deployment {
    /// Receipt of the deployment transaction.
    pub receipt: TransactionReceipt,
    /// Address of the deployed contract.
    pub contract_address: Address,
}

/// Builds and deploys one `#[entrypoint]` crate with `cargo stylus deploy`.
pub struct Deployer {
    rpc_url: String,
    private_key: String,
    package: Option<String>,
    ctr_args: Option<Vec<String>>,
}

impl Deployer {
    /// Creates a deployer that signs with `private_key` against `rpc_url`.
    #[must_use]
    pub fn new(rpc_url: String, private_key: String) -> Self {
        Self { rpc_url, private_key, package: None, ctr_args: None }
    }

    /// Deploy the crate at `deployments/<package>` instead of the current
    /// crate.
    #[must_use]
    pub fn with_package(mut self, package: &str) -> Deployer {
        self.package = Some(package.to_string());
        self
    }

    /// Add constructor arguments to the deployer. An empty list still runs
    /// the constructor.
    #[must_use]
    pub fn with_constructor(mut self, ctr_args: Vec<String>) -> Deployer {
        self.ctr_args = Some(ctr_args);
        self
    }

    /// Builds, deploys and activates the selected crate, running its
    /// constructor when [`Deployer::with_constructor`] was called.
    ///
    /// # Errors
    ///
    /// May error if:
    ///
    /// - `cargo stylus deploy` fails, in which case its stderr is reported.
    /// - The deployed address or transaction cannot be found in its output.
    /// - The receipt cannot be fetched.
    #[tracing::instrument(skip(self), fields(package = ?self.package))]
    pub async fn deploy(self) -> eyre::Result<Deployment> {
        let mut command = Command::new("cargo");
        command
            .args(["stylus", "deploy"])
            .args(["-e", &self.rpc_url])
            .args(["--private-key", &self.private_key])
            .args(["--no-verify"]);

        if let Some(dir) = self.package_dir()? {
            command.current_dir(dir);
        }

        if let Some(ctr_args) = &self.ctr_args {
            let deployer_address = env(DEPLOYER_ADDRESS)?;

            command
                .args(["--experimental-deployer-address", &deployer_address])
                .arg("--experimental-constructor-args")
                .args(ctr_args);
        }

        let output = command
            .output()
            .context("could not run `cargo stylus deploy`")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(%stderr, "deployment failed");
            return Err(eyre::eyre!("Deployment failed: {}", stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let (tx_hash, contract_address) = parse_deploy_output(&stdout)?;
        tracing::info!(%contract_address, %tx_hash, "contract deployed");

        let receipt = self.get_receipt(tx_hash).await?;
        Ok(Deployment { receipt, contract_address })
    }

    fn package_dir(&self) -> eyre::Result<Option<PathBuf>> {
        self.package
            .as_ref()
            .map(|package| {
                Ok(get_workspace_root()?.join(DEPLOYMENTS_DIR).join(package))
            })
            .transpose()
    }

    async fn get_receipt(
        &self,
        tx_hash: TxHash,
    ) -> eyre::Result<TransactionReceipt> {
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(
                self.private_key.parse::<PrivateKeySigner>()?,
            ))
            .connect_http(
                Url::from_str(&self.rpc_url).wrap_err("invalid rpc url")?,
            );

        provider
            .get_transaction_receipt(tx_hash)
            .await
            .wrap_err("RPC error")?
            .ok_or_else(|| eyre::eyre!("Transaction receipt not found"))
    }
}

/// Extracts the transaction hash and the contract address printed by
/// `cargo stylus deploy`.
fn parse_deploy_output(output: &str) -> eyre::Result<(TxHash, Address)> {
    // The pattern matches a 0x followed by 64 hex characters.
    let tx_hash_regex = Regex::new(r"0x[a-fA-F0-9]{64}")
        .context("invalid tx hash pattern")?;

    // The pattern matches the contract address that is preceded by ANSI
    // escape codes (`cargo stylus deploy` outputs colored text).
    let contract_addr_regex = Regex::new(
        r"deployed code at address:\s*(?:\x1B\[[0-9;]*[a-zA-Z])*(0x[a-fA-F0-9]{40})",
    )
    .context("invalid contract address pattern")?;

    let tx_hash = tx_hash_regex
        .find(output)
        .context(format!("No transaction hash found in output {output}"))?
        .as_str();

    let contract_addr = contract_addr_regex
        .captures(output)
        .and_then(|cap| cap.get(1))
        .context(format!("No contract address found in output {output}"))?
        .as_str();

    let contract_address = Address::from_str(contract_addr).context(
        format!("Failed to parse contract address from string: {contract_addr}"),
    )?;
    let tx_hash = TxHash::from_str(tx_hash)
        .context("invalid transaction hash")?;

    Ok((tx_hash, contract_address))
}
