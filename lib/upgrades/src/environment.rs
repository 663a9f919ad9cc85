use std::{path::PathBuf, process::Command};

use eyre::Context;

/// Endpoint of the Stylus node. Required.
pub const RPC_URL: &str = "RPC_URL";
/// Hex private key of a funded account. Optional: when missing, accounts are
/// funded through the nitro test node.
pub const PRIVATE_KEY: &str = "PRIVATE_KEY";
/// Address of the `StylusDeployer` that runs constructors on deployment.
pub const DEPLOYER_ADDRESS: &str = "DEPLOYER_ADDRESS";
/// Path to a nitro test node checkout. Optional: defaults to
/// `nitro-testnode` at the workspace root.
pub const NITRO_NODE_PATH: &str = "NITRO_NODE_PATH";

/// Loads the `name` environment variable.
pub(crate) fn env(name: &str) -> eyre::Result<String> {
    std::env::var(name).wrap_err(format!("failed to load {name}"))
}

/// Loads the `name` environment variable if it is set and non-empty.
pub(crate) fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Gets expected path to the nitro test node.
pub(crate) fn get_node_path() -> eyre::Result<PathBuf> {
    if let Some(path) = env_opt(NITRO_NODE_PATH) {
        return Ok(PathBuf::from(path));
    }

    Ok(get_workspace_root()?.join("nitro-testnode"))
}

/// Runs the following command to get the workspace root:
///
/// ```bash
/// git rev-parse --show-toplevel
/// ```
pub(crate) fn get_workspace_root() -> eyre::Result<PathBuf> {
    let output = Command::new("git")
        .arg("rev-parse")
        .arg("--show-toplevel")
        .output()
        .wrap_err("should run `git rev-parse --show-toplevel`")?;

    let path = String::from_utf8_lossy(&output.stdout)
        .trim()
        .to_string()
        .parse::<PathBuf>()
        .wrap_err("failed to parse workspace root path")?;
    Ok(path)
}
