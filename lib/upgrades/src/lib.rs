//! Deploy and upgrade UUPS proxies on a Stylus node.
//!
//! Contracts are built and deployed with `cargo stylus deploy`; the node and
//! the funding account are configured through environment variables (see
//! [`RPC_URL`], [`PRIVATE_KEY`], [`DEPLOYER_ADDRESS`] and
//! [`NITRO_NODE_PATH`]).
mod account;
mod deploy;
mod environment;
mod error;
mod event;
mod proxy;
mod system;

pub use account::Account;
pub use deploy::{ConstructorArg, Deployer, Deployment};
pub use environment::{
    DEPLOYER_ADDRESS, NITRO_NODE_PATH, PRIVATE_KEY, RPC_URL,
};
pub use error::RevertExt;
pub use event::ReceiptExt;
pub use proxy::{
    deploy_implementation, deploy_proxy, implementation, upgrade_proxy,
    IUUPSProxy, PROXY_PACKAGE,
};
pub use system::{fund_account, Wallet};

/// Installs a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test: only the first call installs it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
