use std::str::FromStr;

use alloy::{
    network::TransactionBuilder,
    primitives::{uint, Address, U256},
    providers::Provider,
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use eyre::Context;
use once_cell::sync::Lazy;
use tokio::sync::{Mutex, MutexGuard};

use crate::{
    deploy::Deployer,
    environment::{env_opt, PRIVATE_KEY},
    system::{fund_account, rpc_url, wallet, Wallet},
};

/// 0.1 ETH.
const DEFAULT_FUNDING_WEI: U256 = uint!(100_000_000_000_000_000_U256);
const TEST_NODE_FUNDING_ETH: u32 = 10;

/// A funded key on the Stylus node, plus a provider that signs with it.
#[derive(Clone)]
pub struct Account {
    /// Local key used to sign transactions.
    pub signer: PrivateKeySigner,
    /// The account's wallet, an `alloy` provider signing with `signer`.
    pub wallet: Wallet,
    url: Url,
}

impl Account {
    /// Creates a new funded account.
    ///
    /// The account is funded from [`PRIVATE_KEY`] when set, and through the
    /// nitro test node otherwise.
    ///
    /// # Errors
    ///
    /// May fail if the environment is incomplete or funding the account
    /// fails.
    pub async fn new() -> eyre::Result<Self> {
        AccountFactory::create().await
    }

    /// Wraps an existing key, e.g. the one in [`PRIVATE_KEY`].
    ///
    /// # Errors
    ///
    /// May fail if `private_key` is not a valid key or [`crate::RPC_URL`] is
    /// missing.
    pub fn from_private_key(private_key: &str) -> eyre::Result<Self> {
        let signer = PrivateKeySigner::from_str(private_key)
            .wrap_err("failed to parse private key")?;
        let url = rpc_url()?;
        let wallet = wallet(signer.clone(), url.clone());
        Ok(Self { signer, wallet, url })
    }

    /// Hex private key, as `cargo stylus deploy` expects it.
    #[must_use]
    pub fn pk(&self) -> String {
        alloy::hex::encode(self.signer.to_bytes())
    }

    /// Address of [`Self::signer`].
    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The rpc endpoint this account's provider is connected to.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// A [`Deployer`] that signs with this account.
    #[must_use]
    pub fn as_deployer(&self) -> Deployer {
        Deployer::new(self.url().to_string(), self.pk())
    }

    /// Native balance of this account.
    ///
    /// # Errors
    ///
    /// May fail if the node cannot be reached.
    pub async fn balance(&self) -> eyre::Result<U256> {
        Ok(self.wallet.get_balance(self.address()).await?)
    }

    /// Transfers `value` wei to `to` and waits for inclusion.
    ///
    /// # Errors
    ///
    /// May fail if the transfer is rejected.
    pub async fn send_value(
        &self,
        to: Address,
        value: U256,
    ) -> eyre::Result<()> {
        let tx = TransactionRequest::default()
            .with_from(self.address())
            .with_to(to)
            .with_value(value);

        self.wallet
            .send_transaction(tx)
            .await?
            .watch()
            .await
            .wrap_err("funds were not sent")?;

        Ok(())
    }
}

/// Serializes account creation: every new account is funded by the same
/// wallet, and concurrent transfers would reuse its nonce.
struct AccountFactory;

impl AccountFactory {
    /// Waits for exclusive access to the factory.
    async fn lock() -> MutexGuard<'static, Self> {
        static SYNC_ACCOUNT_FACTORY: Lazy<Mutex<AccountFactory>> =
            Lazy::new(|| Mutex::new(AccountFactory));

        SYNC_ACCOUNT_FACTORY.lock().await
    }

    /// Generates a random key and funds it.
    async fn create() -> eyre::Result<Account> {
        let _lock = AccountFactory::lock().await;

        let signer = PrivateKeySigner::random();
        let url = rpc_url()?;
        let account = Account {
            wallet: wallet(signer.clone(), url.clone()),
            signer,
            url,
        };

        match env_opt(PRIVATE_KEY) {
            Some(private_key) => {
                let funder = Account::from_private_key(&private_key)?;
                funder
                    .send_value(account.address(), DEFAULT_FUNDING_WEI)
                    .await
                    .wrap_err("account's wallet wasn't funded")?;
            }
            None => fund_account(account.address(), TEST_NODE_FUNDING_ETH)?,
        }

        tracing::info!(address = %account.address(), "created test account");
        Ok(account)
    }
}
